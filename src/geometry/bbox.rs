//! Quadrilateral bounding boxes.
//!
//! Corners are always held in the order top-left, top-right, bottom-right,
//! bottom-left. Boxes need not be axis-aligned; every box the decoder builds
//! is convex.

use std::ops::Index;

use super::point::{adjust, Point, PointList};

pub const TL: usize = 0;
pub const TR: usize = 1;
pub const BR: usize = 2;
pub const BL: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox(pub [Point; 4]);

impl BBox {
    pub const fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self([tl, tr, br, bl])
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.0
    }

    /// Returns this box moved by (x, y).
    pub fn offset(&self, x: i32, y: i32) -> Self {
        Self(self.0.map(|p| p.offset(x, y)))
    }

    /// Shrinks the box by moving each corner `m` pixels toward both of its
    /// neighbouring corners. Winding is preserved.
    pub fn inner(&self, m: i32) -> Self {
        let mut out = self.0;
        for (i, corner) in out.iter_mut().enumerate() {
            let c = self.0[i];
            let next = adjust(c, self.0[(i + 1) % 4], m);
            let prev = adjust(c, self.0[(i + 3) % 4], m);
            *corner = Point::new(next.x + prev.x - c.x, next.y + prev.y - c.y);
        }
        Self(out)
    }

    /// Point-in-quad test. Points on an edge are inside.
    ///
    /// Casts a ray to the right of `p` and counts edge crossings. An edge only
    /// counts when exactly one of its end-points lies strictly below the ray,
    /// so a ray through a shared vertex is counted once.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for i in 0..4 {
            let a = self.0[i];
            let b = self.0[(i + 1) % 4];
            if on_edge(a, b, p) {
                return true;
            }
            if (a.y > p.y) != (b.y > p.y) {
                let lhs = (p.x - a.x) as i64 * (b.y - a.y) as i64;
                let rhs = (p.y - a.y) as i64 * (b.x - a.x) as i64;
                let left_of_edge = if b.y > a.y { lhs < rhs } else { lhs > rhs };
                if left_of_edge {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Enumerates every integer point inside the box. Order is unspecified.
    pub fn points(&self) -> PointList {
        let (min, max) = self.extent();
        let mut list = PointList::new();
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let p = Point::new(x, y);
                if self.contains(p) {
                    list.push(p);
                }
            }
        }
        list
    }

    /// Smallest axis-aligned rectangle covering the box, as (min, max) corners.
    pub fn extent(&self) -> (Point, Point) {
        let xs = self.0.iter().map(|p| p.x);
        let ys = self.0.iter().map(|p| p.y);
        (
            Point::new(xs.clone().min().unwrap_or(0), ys.clone().min().unwrap_or(0)),
            Point::new(xs.max().unwrap_or(0), ys.max().unwrap_or(0)),
        )
    }
}

impl Index<usize> for BBox {
    type Output = Point;

    fn index(&self, i: usize) -> &Point {
        &self.0[i]
    }
}

fn on_edge(a: Point, b: Point, p: Point) -> bool {
    let cross = (b.x - a.x) as i64 * (p.y - a.y) as i64 - (b.y - a.y) as i64 * (p.x - a.x) as i64;
    cross == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}
