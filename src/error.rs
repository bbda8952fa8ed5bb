//! Error type for decoder construction, calibration and persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LcdError {
    #[error("Duplicate template name: {0}")]
    DuplicateTemplate(String),

    #[error("Template {name}: expected 6 bounding box values, got {count}")]
    BadGeometry { name: String, count: usize },

    #[error("Template {name}: decimal point needs 0 or 2 values, got {count}")]
    BadDecimalPoint { name: String, count: usize },

    #[error("Template {name}: invalid stroke width {width}")]
    BadWidth { name: String, width: i32 },

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Calibration string has {got} characters, expected {expected}")]
    CalibrationLength { expected: usize, got: usize },

    #[error("Character {0:?} has no segment mask")]
    UnknownCharacter(char),

    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    #[error("No calibration levels found")]
    NoLevels,

    #[error("Failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LcdError>;
