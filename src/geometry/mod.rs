//! Integer geometry used to lay out digit templates.

pub mod bbox;
pub mod point;

pub use bbox::{BBox, BL, BR, TL, TR};
pub use point::{adjust, split, Point, PointList};
