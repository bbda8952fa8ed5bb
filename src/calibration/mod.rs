//! Calibration state: moving-average levels, scored calibration sets, the
//! population of sets kept for later use, their file format and a preview
//! renderer for checking digit placement.

pub mod average;
pub mod levels;
pub mod population;
pub mod preview;
pub mod storage;

pub use average::MovingAverage;
pub use levels::{DigitLevels, LevelsSet, SegmentLevels};
pub use population::Population;
pub use preview::{render_preview, save_preview};
