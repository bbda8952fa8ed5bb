//! A template placed at an absolute image position.

use super::template::{SegmentShape, Template};
use crate::geometry::{BBox, Point, PointList};
use crate::lcd::table::SEGMENTS;

/// An anchored digit. Its `index` selects its levels in the decoder's
/// current calibration set.
#[derive(Clone, Debug)]
pub struct Digit {
    pub index: usize,
    pub template: String,
    pub pos: Point,
    pub bb: BBox,
    pub segments: [SegmentShape; SEGMENTS],
    pub off: PointList,
    pub dp: PointList,
}

impl Digit {
    pub fn new(index: usize, template: &Template, x: i32, y: i32) -> Self {
        Self {
            index,
            template: template.name().to_string(),
            pos: Point::new(x, y),
            bb: template.bb().offset(x, y),
            segments: template.segments().clone().map(|s| s.offset(x, y)),
            off: template.off().offset(x, y),
            dp: template.dp().offset(x, y),
        }
    }

    pub fn has_dp(&self) -> bool {
        !self.dp.is_empty()
    }
}
