//! Integer pixel points and point lists.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A pixel position. Coordinates are signed so template offsets can point
/// left of or above the digit origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by (x, y).
    pub fn offset(self, x: i32, y: i32) -> Self {
        Self::new(self.x + x, self.y + y)
    }

    /// Enumerates the (w+1)² points of the axis-aligned square of side `w`
    /// centred on this point.
    pub fn block(self, w: i32) -> PointList {
        if w < 0 {
            return PointList::new();
        }
        let half = w / 2;
        let mut list = PointList::with_capacity(((w + 1) * (w + 1)) as usize);
        for dy in 0..=w {
            for dx in 0..=w {
                list.push(Self::new(self.x - half + dx, self.y - half + dy));
            }
        }
        list
    }
}

/// Returns the point on the line from `s` toward `e` at distance `d` from `s`.
///
/// The divisor is `round(|e - s| + 0.5)`, so a move of `d` along a short edge
/// usually lands one pixel short. Template geometry depends on this exact
/// rounding.
pub fn adjust(s: Point, e: Point, d: i32) -> Point {
    let dx = e.x - s.x;
    let dy = e.y - s.y;
    let length = ((dx as f64).hypot(dy as f64) + 0.5).round() as i32;
    if length == 0 {
        return s;
    }
    Point::new(s.x + dx * d / length, s.y + dy * d / length)
}

/// Splits the line from `s` to `e` into `n` sections, returning the `n - 1`
/// interior points at fractions 1/n .. (n-1)/n.
pub fn split(s: Point, e: Point, n: i32) -> PointList {
    let dx = e.x - s.x;
    let dy = e.y - s.y;
    (1..n.max(1))
        .map(|i| Point::new(s.x + dx * i / n, s.y + dy * i / n))
        .collect()
}

/// An ordered list of points. Samplers treat it as a bag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointList(Vec<Point>);

impl PointList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub fn push(&mut self, p: Point) {
        self.0.push(p);
    }

    /// Appends every point of `other`.
    pub fn append(&mut self, other: &PointList) {
        self.0.extend_from_slice(&other.0);
    }

    /// Returns a copy of this list with every point moved by (x, y).
    pub fn offset(&self, x: i32, y: i32) -> Self {
        self.0.iter().map(|p| p.offset(x, y)).collect()
    }
}

impl Deref for PointList {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.0
    }
}

impl FromIterator<Point> for PointList {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointList {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_uses_rounded_length() {
        // length = round(100 + 0.5) = 101, so 8 * 100 / 101 = 7
        assert_eq!(adjust(Point::new(0, 0), Point::new(0, 100), 8), Point::new(0, 7));
        assert_eq!(adjust(Point::new(0, 100), Point::new(0, 0), 8), Point::new(0, 93));
        // Negative offsets truncate toward zero
        assert_eq!(adjust(Point::new(0, 50), Point::new(0, 0), 4), Point::new(0, 47));
    }

    #[test]
    fn test_adjust_same_point() {
        let p = Point::new(3, 4);
        assert_eq!(adjust(p, p, 10), p);
    }

    #[test]
    fn test_split() {
        let mid = split(Point::new(0, 0), Point::new(0, 100), 2);
        assert_eq!(&mid[..], &[Point::new(0, 50)]);

        let thirds = split(Point::new(0, 0), Point::new(10, 20), 3);
        assert_eq!(&thirds[..], &[Point::new(3, 6), Point::new(6, 13)]);

        assert!(split(Point::new(0, 0), Point::new(5, 5), 1).is_empty());
    }

    #[test]
    fn test_block() {
        let block = Point::new(10, 10).block(4);
        assert_eq!(block.len(), 25);
        assert!(block.contains(&Point::new(8, 8)));
        assert!(block.contains(&Point::new(12, 12)));
        assert!(!block.contains(&Point::new(13, 12)));

        assert_eq!(Point::new(0, 0).block(0).len(), 1);
        assert!(Point::new(0, 0).block(-1).is_empty());
    }

    #[test]
    fn test_offset() {
        let list: PointList = [Point::new(1, 2), Point::new(-3, 4)].into_iter().collect();
        let moved = list.offset(10, -1);
        assert_eq!(&moved[..], &[Point::new(11, 1), Point::new(7, 3)]);
        // Original untouched
        assert_eq!(list[0], Point::new(1, 2));
    }
}
