//! Digit templates: the sample regions of one size and style of digit.
//!
//! A template is laid out relative to its top-left corner at (0, 0). The
//! other three corners, the stroke width and an optional decimal point
//! position define seven segment regions plus the two blank squares inside
//! the digit used as the "off" reference.
//!
//! The vertical strokes do not run from the outer corners to the edge
//! midpoints. They start one stroke width in from the top and bottom
//! corners so that the horizontal strokes own the junctions and every pixel
//! belongs to at most one region.

use crate::error::{LcdError, Result};
use crate::geometry::{adjust, split, BBox, Point, PointList, BL, BR, TL, TR};
use crate::lcd::table::SEGMENTS;

/// Sample region of one segment.
#[derive(Clone, Debug)]
pub struct SegmentShape {
    pub bb: BBox,
    pub points: PointList,
}

impl SegmentShape {
    fn new(bb: BBox) -> Self {
        let points = bb.points();
        Self { bb, points }
    }

    pub fn offset(&self, x: i32, y: i32) -> Self {
        Self {
            bb: self.bb.offset(x, y),
            points: self.points.offset(x, y),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Template {
    name: String,
    width: i32,
    bb: BBox,
    dp: PointList,
    ml: Point,
    mr: Point,
    tml: Point,
    tmr: Point,
    bml: Point,
    bmr: Point,
    segments: [SegmentShape; SEGMENTS],
    off: PointList,
}

/// Quad of the stroke along the edge `s`-`e`, `w` thick toward the
/// opposite edge `ps`-`pe`, then shrunk by `m`.
fn segment_bb(s: Point, e: Point, ps: Point, pe: Point, w: i32, m: i32) -> BBox {
    let ns = adjust(s, ps, w);
    let ne = adjust(e, pe, w);
    BBox::new(s, e, ne, ns).inner(m)
}

impl Template {
    /// Builds a template.
    ///
    /// `bb` holds the signed offsets of the TR, BR and BL corners as six
    /// integers; `dp` is empty or the two-integer offset of the decimal point.
    pub fn new(
        name: &str,
        bb: &[i32],
        dp: &[i32],
        width: i32,
        on_margin: i32,
        off_margin: i32,
    ) -> Result<Self> {
        if bb.len() != 6 {
            return Err(LcdError::BadGeometry {
                name: name.to_string(),
                count: bb.len(),
            });
        }
        if !dp.is_empty() && dp.len() != 2 {
            return Err(LcdError::BadDecimalPoint {
                name: name.to_string(),
                count: dp.len(),
            });
        }
        if width <= 0 {
            return Err(LcdError::BadWidth {
                name: name.to_string(),
                width,
            });
        }

        let outer = BBox::new(
            Point::new(0, 0),
            Point::new(bb[0], bb[1]),
            Point::new(bb[2], bb[3]),
            Point::new(bb[4], bb[5]),
        );
        let (tl, tr, br, bl) = (outer[TL], outer[TR], outer[BR], outer[BL]);
        let half = width / 2;

        let dp = match dp {
            [x, y] => Point::new(*x, *y).block(half),
            _ => PointList::new(),
        };

        let ml = split(tl, bl, 2)[0];
        let mr = split(tr, br, 2)[0];
        let tml = adjust(ml, tl, half);
        let tmr = adjust(mr, tr, half);
        let bml = adjust(ml, bl, half);
        let bmr = adjust(mr, br, half);

        // Vertical strokes stop where the horizontal strokes begin so that
        // no pixel is sampled by two segments.
        let tl_low = adjust(tl, bl, width);
        let tr_low = adjust(tr, br, width);
        let bl_high = adjust(bl, tl, width);
        let br_high = adjust(br, tr, width);

        let m = on_margin;
        let segments = [
            SegmentShape::new(segment_bb(tl_low, tml, tr_low, tmr, width, m)),
            SegmentShape::new(segment_bb(tl, tr, bl, br, width, m)),
            SegmentShape::new(segment_bb(tr_low, tmr, tl_low, tml, width, m)),
            SegmentShape::new(segment_bb(bmr, br_high, bml, bl_high, width, m)),
            SegmentShape::new(segment_bb(bl, br, tl, tr, width, m)),
            SegmentShape::new(segment_bb(bml, bl_high, bmr, br_high, width, m)),
            SegmentShape::new(segment_bb(tml, tmr, bml, bmr, width, m)),
        ];

        let upper = BBox::new(tl, tr, tmr, tml).inner(width + off_margin);
        let lower = BBox::new(bml, bmr, br, bl).inner(width + off_margin);
        let mut off = upper.points();
        off.append(&lower.points());

        Ok(Self {
            name: name.to_string(),
            width,
            bb: outer,
            dp,
            ml,
            mr,
            tml,
            tmr,
            bml,
            bmr,
            segments,
            off,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stroke width in pixels.
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn bb(&self) -> &BBox {
        &self.bb
    }

    pub fn segments(&self) -> &[SegmentShape; SEGMENTS] {
        &self.segments
    }

    pub fn off(&self) -> &PointList {
        &self.off
    }

    pub fn dp(&self) -> &PointList {
        &self.dp
    }

    pub fn has_dp(&self) -> bool {
        !self.dp.is_empty()
    }

    /// Midpoints of the left and right edges.
    pub fn midpoints(&self) -> (Point, Point) {
        (self.ml, self.mr)
    }

    /// Midpoints moved half a stroke toward the top and bottom corners,
    /// as (tml, tmr, bml, bmr).
    pub fn inset_midpoints(&self) -> (Point, Point, Point, Point) {
        (self.tml, self.tmr, self.bml, self.bmr)
    }
}
