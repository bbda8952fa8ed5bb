//! Calibration file reading and writing.
//!
//! Text format, one comma-separated record per line:
//!
//! ```text
//! index,quality                  starts calibration set `index`
//! index,digit,segment,min,max    levels of one segment of that set
//! ```
//!
//! Set indices are zero-based and never decrease through the file; a
//! repeated index starts another set. A segment record must refer to the
//! most recently started set. Bad lines are logged and skipped.

use std::io::{BufRead, Write};

use super::levels::LevelsSet;
use crate::error::{LcdError, Result};
use crate::lcd::table::SEGMENTS;

/// Writes `sets` in the given order, numbering them from zero.
///
/// Segments without both min and max history are left out; they read back
/// as having no history.
pub fn write_levels<W: Write>(mut w: W, sets: &[&LevelsSet]) -> Result<()> {
    for (index, set) in sets.iter().enumerate() {
        writeln!(w, "{},{}", index, set.quality)?;
        for (d, digit) in set.digits.iter().enumerate() {
            for (s, seg) in digit.segments.iter().enumerate() {
                if seg.min.is_empty() || seg.max.is_empty() {
                    continue;
                }
                writeln!(w, "{},{},{},{},{}", index, d, s, seg.min.value(), seg.max.value())?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// Reads calibration sets for a decoder with `digits` digits.
///
/// Each set starts blank; segment records fill their moving averages with
/// copies of the saved value. Thresholds are computed at `percent`.
/// Returns `LcdError::NoLevels` if no set could be read.
pub fn read_levels<R: BufRead>(
    reader: R,
    digits: usize,
    history: usize,
    max_levels: usize,
    percent: i32,
) -> Result<Vec<LevelsSet>> {
    let mut sets: Vec<LevelsSet> = Vec::new();
    let mut open: Option<i64> = None;
    let mut last_index: Option<i64> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: std::result::Result<Vec<i64>, _> =
            line.split(',').map(|f| f.trim().parse::<i64>()).collect();
        let fields = match fields {
            Ok(fields) => fields,
            Err(e) => {
                crate::log(&format!(
                    "Warning: Skipping malformed calibration line {}: {} ({})",
                    line_num + 1,
                    line,
                    e
                ));
                continue;
            }
        };

        match fields[..] {
            [index, quality] => {
                open = None;
                if index < 0 || index >= max_levels as i64 {
                    crate::log(&format!(
                        "Warning: Calibration line {}: index {} outside 0..{}",
                        line_num + 1,
                        index,
                        max_levels
                    ));
                    continue;
                }
                if last_index.is_some_and(|last| index < last) {
                    crate::log(&format!(
                        "Warning: Calibration line {}: index {} out of order",
                        line_num + 1,
                        index
                    ));
                    continue;
                }
                if !(0..=100).contains(&quality) {
                    crate::log(&format!(
                        "Warning: Calibration line {}: quality {} outside 0..=100",
                        line_num + 1,
                        quality
                    ));
                    continue;
                }
                let mut set = LevelsSet::blank(digits, history);
                set.quality = quality as u32;
                sets.push(set);
                open = Some(index);
                last_index = Some(index);
            }
            [index, digit, segment, min, max] => {
                if open != Some(index) {
                    crate::log(&format!(
                        "Warning: Calibration line {}: record for index {} outside its set",
                        line_num + 1,
                        index
                    ));
                    continue;
                }
                if digit < 0 || digit >= digits as i64 {
                    crate::log(&format!(
                        "Warning: Calibration line {}: digit {} out of range",
                        line_num + 1,
                        digit
                    ));
                    continue;
                }
                if segment < 0 || segment >= SEGMENTS as i64 {
                    crate::log(&format!(
                        "Warning: Calibration line {}: segment {} out of range",
                        line_num + 1,
                        segment
                    ));
                    continue;
                }
                let (Ok(min), Ok(max)) = (i32::try_from(min), i32::try_from(max)) else {
                    crate::log(&format!(
                        "Warning: Calibration line {}: level {},{} out of range",
                        line_num + 1,
                        min,
                        max
                    ));
                    continue;
                };
                if let Some(set) = sets.last_mut() {
                    let seg = &mut set.digits[digit as usize].segments[segment as usize];
                    seg.min.init(min);
                    seg.max.init(max);
                }
            }
            _ => {
                crate::log(&format!(
                    "Warning: Skipping calibration line {}: expected 2 or 5 fields, got {}",
                    line_num + 1,
                    fields.len()
                ));
            }
        }
    }

    if sets.is_empty() {
        return Err(LcdError::NoLevels);
    }
    for set in sets.iter_mut() {
        set.update_thresholds(percent);
    }
    Ok(sets)
}
