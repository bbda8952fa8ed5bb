//! Per-segment calibration levels and complete calibration snapshots.

use super::average::MovingAverage;
use crate::lcd::table::SEGMENTS;

/// Threshold used while a segment has no min or max history.
pub const DEFAULT_THRESHOLD: i32 = 0x8000;

/// Returns the value `percent`% of the way from `min` to `max`.
pub fn interpolate(min: i32, max: i32, percent: i32) -> i32 {
    (min as i64 + (max as i64 - min as i64) * percent as i64 / 100) as i32
}

/// Off/on levels of one segment.
#[derive(Clone, Debug)]
pub struct SegmentLevels {
    /// Recent samples taken while the segment was off.
    pub min: MovingAverage,
    /// Recent samples taken while the segment was on.
    pub max: MovingAverage,
    threshold: i32,
}

impl SegmentLevels {
    pub fn new(history: usize) -> Self {
        Self {
            min: MovingAverage::new(history),
            max: MovingAverage::new(history),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Samples at or above this value count as "on".
    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn update_threshold(&mut self, percent: i32) {
        self.threshold = if self.min.is_empty() || self.max.is_empty() {
            DEFAULT_THRESHOLD
        } else {
            interpolate(self.min.value(), self.max.value(), percent)
        };
    }
}

/// Levels for every segment of one digit, plus the decimal point threshold
/// derived from them.
///
/// The decimal point has no history of its own; its min and max are the
/// means of the segment levels and are only recomputed, never updated.
#[derive(Clone, Debug)]
pub struct DigitLevels {
    pub segments: [SegmentLevels; SEGMENTS],
    min: i32,
    max: i32,
    dp_threshold: i32,
}

impl DigitLevels {
    pub fn new(history: usize) -> Self {
        Self {
            segments: std::array::from_fn(|_| SegmentLevels::new(history)),
            min: 0,
            max: 0,
            dp_threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Creates levels with every segment's window pre-filled.
    pub fn with_levels(history: usize, min: i32, max: i32) -> Self {
        let mut levels = Self::new(history);
        for seg in levels.segments.iter_mut() {
            seg.min.init(min);
            seg.max.init(max);
        }
        levels
    }

    /// Mean of the segment minimums.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Mean of the segment maximums.
    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn dp_threshold(&self) -> i32 {
        self.dp_threshold
    }

    /// Recomputes all segment thresholds and the aggregate decimal point level.
    pub fn update_thresholds(&mut self, percent: i32) {
        for seg in self.segments.iter_mut() {
            seg.update_threshold(percent);
        }
        let mins: Vec<i64> = self
            .segments
            .iter()
            .filter(|s| !s.min.is_empty())
            .map(|s| s.min.value() as i64)
            .collect();
        let maxs: Vec<i64> = self
            .segments
            .iter()
            .filter(|s| !s.max.is_empty())
            .map(|s| s.max.value() as i64)
            .collect();
        if mins.is_empty() || maxs.is_empty() {
            self.min = 0;
            self.max = 0;
            self.dp_threshold = DEFAULT_THRESHOLD;
            return;
        }
        self.min = (mins.iter().sum::<i64>() / mins.len() as i64) as i32;
        self.max = (maxs.iter().sum::<i64>() / maxs.len() as i64) as i32;
        self.dp_threshold = interpolate(self.min, self.max, percent);
    }
}

/// One complete calibration: levels for every digit plus decode accounting.
#[derive(Clone, Debug, Default)]
pub struct LevelsSet {
    pub digits: Vec<DigitLevels>,
    /// Decodes reported good since this set was last made current.
    pub good: u32,
    /// Decodes reported bad since this set was last made current.
    pub bad: u32,
    /// Percentage of good decodes, 0..=100, as of the last recalibration.
    pub quality: u32,
}

impl LevelsSet {
    /// A set of `digits` digits with no level history.
    pub fn blank(digits: usize, history: usize) -> Self {
        Self {
            digits: (0..digits).map(|_| DigitLevels::new(history)).collect(),
            ..Default::default()
        }
    }

    /// Copy of this set with the good/bad counters cleared.
    pub fn fresh_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.reset_counts();
        copy
    }

    pub fn reset_counts(&mut self) {
        self.good = 0;
        self.bad = 0;
    }

    /// Recomputes quality from the good/bad counters. A set without any
    /// votes keeps its previous quality.
    pub fn update_quality(&mut self) {
        let total = self.good as u64 + self.bad as u64;
        if total > 0 {
            self.quality = (self.good as u64 * 100 / total) as u32;
        }
    }

    pub fn update_thresholds(&mut self, percent: i32) {
        for digit in self.digits.iter_mut() {
            digit.update_thresholds(percent);
        }
    }
}
