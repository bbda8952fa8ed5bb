//! Seven-segment digit decoding.
//!
//! Templates describe a digit shape, digits place a template on the image,
//! and the decoder samples every digit and maps segment masks to characters.

pub mod decoder;
pub mod digit;
pub mod sample;
pub mod table;
pub mod template;

pub use decoder::{DecodeResult, DigitDecode, DigitScan, LcdDecoder};
pub use digit::Digit;
pub use sample::{sample_region, ImageSource};
pub use table::{lookup, mask_for, Segment, INVALID_CHAR, SEGMENTS};
pub use template::{SegmentShape, Template};
