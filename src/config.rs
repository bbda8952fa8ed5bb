//! Decoder configuration.
//!
//! A decoder is described by a JSON file holding the tuning options, the
//! digit templates and the digit positions. Every option has a default, so
//! a minimal file only lists templates and digits:
//!
//! ```json
//! {
//!   "templates": [{ "name": "big", "bb": [60, 0, 60, 100, 0, 100], "width": 8 }],
//!   "digits": [{ "template": "big", "x": 10, "y": 20 }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{LcdError, Result};

fn default_threshold_percent() -> i32 {
    50
}

fn default_history() -> usize {
    5
}

fn default_max_levels() -> usize {
    100
}

fn default_saved_levels() -> usize {
    50
}

fn default_on_margin() -> i32 {
    2
}

fn default_off_margin() -> i32 {
    5
}

fn default_anchor_off_baseline() -> bool {
    true
}

/// Tuning options of a decoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecoderOptions {
    /// Position of each segment threshold between its off and on levels (0-100)
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: i32,
    /// Number of samples kept in each moving average
    #[serde(default = "default_history")]
    pub history: usize,
    /// Maximum number of calibration sets kept in the population
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
    /// Maximum number of calibration sets written when saving
    #[serde(default = "default_saved_levels")]
    pub saved_levels: usize,
    /// Inset of segment sample regions, in pixels
    #[serde(default = "default_on_margin")]
    pub on_margin: i32,
    /// Extra inset of the off reference regions beyond the stroke width
    #[serde(default = "default_off_margin")]
    pub off_margin: i32,
    /// Bright-on-dark display (LED); disables sample inversion
    #[serde(default)]
    pub inverse: bool,
    /// When calibrating, record the off-region sample as the "off" level of
    /// segments expected to be on
    #[serde(default = "default_anchor_off_baseline")]
    pub anchor_off_baseline: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
            history: default_history(),
            max_levels: default_max_levels(),
            saved_levels: default_saved_levels(),
            on_margin: default_on_margin(),
            off_margin: default_off_margin(),
            inverse: false,
            anchor_off_baseline: default_anchor_off_baseline(),
        }
    }
}

impl DecoderOptions {
    /// Checks option ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.threshold_percent) {
            return Err(LcdError::InvalidOption {
                name: "threshold_percent",
                reason: format!("{} is not within 0..=100", self.threshold_percent),
            });
        }
        if self.history == 0 {
            return Err(LcdError::InvalidOption {
                name: "history",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_levels == 0 {
            return Err(LcdError::InvalidOption {
                name: "max_levels",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.saved_levels > self.max_levels {
            return Err(LcdError::InvalidOption {
                name: "saved_levels",
                reason: format!("{} exceeds max_levels {}", self.saved_levels, self.max_levels),
            });
        }
        if self.on_margin < 0 || self.off_margin < 0 {
            return Err(LcdError::InvalidOption {
                name: "margin",
                reason: "margins must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// One digit shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub name: String,
    /// Offsets of the TR, BR and BL corners from the top-left corner
    pub bb: Vec<i32>,
    /// Offset of the decimal point, if the digit has one
    #[serde(default)]
    pub dp: Vec<i32>,
    /// Segment stroke width in pixels
    pub width: i32,
}

/// One digit on the display, in left-to-right order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DigitConfig {
    pub template: String,
    pub x: i32,
    pub y: i32,
    /// Initial off level of every segment
    #[serde(default)]
    pub min: Option<i32>,
    /// Initial on level of every segment
    #[serde(default)]
    pub max: Option<i32>,
}

impl DigitConfig {
    /// Initial (min, max) levels when both are given.
    pub fn levels(&self) -> Option<(i32, i32)> {
        self.min.zip(self.max)
    }
}

/// Complete description of a decoder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LcdConfig {
    #[serde(flatten)]
    pub options: DecoderOptions,
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
    #[serde(default)]
    pub digits: Vec<DigitConfig>,
}

impl LcdConfig {
    /// Loads a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        crate::log_verbose(&format!("Loading decoder config from {}", path.display()));
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option ranges.
    pub fn validate(&self) -> Result<()> {
        self.options.validate()
    }

    /// Writes the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
