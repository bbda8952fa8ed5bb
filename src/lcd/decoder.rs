//! The seven-segment decoder.
//!
//! Each decode samples every segment region of every digit, compares the
//! samples against the thresholds of the current calibration set and maps
//! the resulting masks to characters. Callers vote on each result with
//! `good`/`bad`; `recalibrate` scores the current set from those votes,
//! files it in the population and switches to the best set available.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::digit::Digit;
use super::sample::{sample_region, ImageSource};
use super::table::{self, INVALID_CHAR, SEGMENTS};
use super::template::Template;
use crate::calibration::levels::{DigitLevels, LevelsSet};
use crate::calibration::population::Population;
use crate::calibration::storage::{read_levels, write_levels};
use crate::config::{DecoderOptions, LcdConfig};
use crate::error::{LcdError, Result};

/// Raw samples of one digit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitScan {
    /// Normalised sample of each segment region
    pub segments: [i32; SEGMENTS],
    /// Sample of the blank reference region
    pub off: i32,
    /// Sample of the decimal point block, if the digit has one
    pub dp: Option<i32>,
    /// Segments whose sample reached their threshold
    pub mask: u8,
}

/// Interpretation of one digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigitDecode {
    /// Decoded character, `INVALID_CHAR` when the mask is not recognised
    pub ch: char,
    pub valid: bool,
    /// Decimal point lit
    pub dp: bool,
}

/// Result of decoding one image.
#[derive(Debug)]
pub struct DecodeResult<'a, I: ?Sized> {
    pub img: &'a I,
    /// Characters in digit order, with `.` after any digit whose decimal
    /// point is lit. An unrecognised digit appears as `INVALID_CHAR` ('X')
    /// rather than a NUL byte.
    pub text: String,
    /// Number of digits with an unrecognised mask
    pub invalid: usize,
    pub scans: Vec<DigitScan>,
    pub decodes: Vec<DigitDecode>,
}

impl<I: ?Sized> DecodeResult<'_, I> {
    pub fn is_valid(&self) -> bool {
        self.invalid == 0
    }

    /// Segment masks of every digit.
    pub fn masks(&self) -> Vec<u8> {
        self.scans.iter().map(|s| s.mask).collect()
    }
}

pub struct LcdDecoder {
    options: DecoderOptions,
    templates: HashMap<String, Template>,
    digits: Vec<Digit>,
    current: LevelsSet,
    /// Whether the current set holds calibration worth saving
    current_saved: bool,
    population: Population,
}

impl LcdDecoder {
    pub fn new(options: DecoderOptions) -> Result<Self> {
        options.validate()?;
        let population = Population::new(options.max_levels);
        Ok(Self {
            options,
            templates: HashMap::new(),
            digits: Vec::new(),
            current: LevelsSet::default(),
            current_saved: false,
            population,
        })
    }

    /// Builds a decoder with every template and digit of `config`.
    pub fn from_config(config: &LcdConfig) -> Result<Self> {
        let mut decoder = Self::new(config.options.clone())?;
        for t in &config.templates {
            decoder.add_template(&t.name, &t.bb, &t.dp, t.width)?;
        }
        for d in &config.digits {
            decoder.add_digit(&d.template, d.x, d.y, d.levels())?;
        }
        crate::log(&format!(
            "Decoder ready: {} templates, {} digits",
            decoder.templates.len(),
            decoder.digits.len()
        ));
        Ok(decoder)
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn add_template(&mut self, name: &str, bb: &[i32], dp: &[i32], width: i32) -> Result<()> {
        if self.templates.contains_key(name) {
            return Err(LcdError::DuplicateTemplate(name.to_string()));
        }
        let template = Template::new(
            name,
            bb,
            dp,
            width,
            self.options.on_margin,
            self.options.off_margin,
        )?;
        crate::log_verbose(&format!(
            "Template {}: width {}, segment points {:?}, off points {}",
            name,
            width,
            template.segments().iter().map(|s| s.points.len()).collect::<Vec<_>>(),
            template.off().len()
        ));
        self.templates.insert(name.to_string(), template);
        Ok(())
    }

    /// Places a digit and returns its index. `levels` pre-fills every
    /// segment's (min, max) history.
    pub fn add_digit(
        &mut self,
        template: &str,
        x: i32,
        y: i32,
        levels: Option<(i32, i32)>,
    ) -> Result<usize> {
        let t = self
            .templates
            .get(template)
            .ok_or_else(|| LcdError::UnknownTemplate(template.to_string()))?;
        let index = self.digits.len();
        self.digits.push(Digit::new(index, t, x, y));

        let mut dl = match levels {
            Some((min, max)) => DigitLevels::with_levels(self.options.history, min, max),
            None => DigitLevels::new(self.options.history),
        };
        dl.update_thresholds(self.options.threshold_percent);
        for set in self.population.iter_mut() {
            set.digits.push(dl.clone());
        }
        self.current.digits.push(dl);

        crate::log_verbose(&format!("Digit {} at ({}, {}) using template {}", index, x, y, template));
        Ok(index)
    }

    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    pub fn num_digits(&self) -> usize {
        self.digits.len()
    }

    /// The calibration set used for decoding.
    pub fn current_levels(&self) -> &LevelsSet {
        &self.current
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    fn scan_digit<I: ImageSource + ?Sized>(&self, img: &I, digit: &Digit) -> DigitScan {
        let inverse = self.options.inverse;
        let segments: [i32; SEGMENTS] =
            std::array::from_fn(|i| sample_region(img, &digit.segments[i].points, inverse));
        let off = sample_region(img, &digit.off, inverse);
        let dp = digit.has_dp().then(|| sample_region(img, &digit.dp, inverse));
        let levels = &self.current.digits[digit.index];
        let mut mask = 0u8;
        for (i, (sample, seg)) in segments.iter().zip(levels.segments.iter()).enumerate() {
            if *sample >= seg.threshold() {
                mask |= 1 << i;
            }
        }
        DigitScan {
            segments,
            off,
            dp,
            mask,
        }
    }

    /// Decodes the display shown in `img`.
    pub fn decode<'a, I: ImageSource + ?Sized>(&self, img: &'a I) -> DecodeResult<'a, I> {
        let mut result = DecodeResult {
            img,
            text: String::with_capacity(self.digits.len() * 2),
            invalid: 0,
            scans: Vec::with_capacity(self.digits.len()),
            decodes: Vec::with_capacity(self.digits.len()),
        };
        for digit in &self.digits {
            let scan = self.scan_digit(img, digit);
            let levels = &self.current.digits[digit.index];
            let dp = scan.dp.is_some_and(|v| v >= levels.dp_threshold());
            let decode = match table::lookup(scan.mask) {
                Some(ch) => DigitDecode { ch, valid: true, dp },
                None => {
                    result.invalid += 1;
                    DigitDecode {
                        ch: INVALID_CHAR,
                        valid: false,
                        dp,
                    }
                }
            };
            result.text.push(decode.ch);
            if dp {
                result.text.push('.');
            }
            result.scans.push(scan);
            result.decodes.push(decode);
        }
        result
    }

    /// Calibrates the current set from an image known to show `expected`,
    /// one character per digit.
    pub fn calibrate_from_image<I: ImageSource + ?Sized>(&mut self, img: &I, expected: &str) -> Result<()> {
        let chars: Vec<char> = expected.chars().collect();
        if chars.len() != self.digits.len() {
            return Err(LcdError::CalibrationLength {
                expected: self.digits.len(),
                got: chars.len(),
            });
        }
        let masks = chars
            .iter()
            .map(|&c| table::mask_for(c).ok_or(LcdError::UnknownCharacter(c)))
            .collect::<Result<Vec<u8>>>()?;
        let scans: Vec<DigitScan> = self.digits.iter().map(|d| self.scan_digit(img, d)).collect();
        self.calibrate(&scans, &masks);
        crate::log_verbose(&format!("Calibrated from image showing {:?}", expected));
        Ok(())
    }

    /// Calibrates the current set from a previous decode, trusting the masks
    /// it found.
    pub fn calibrate_from_scan<I: ?Sized>(&mut self, scan: &DecodeResult<'_, I>) -> Result<()> {
        if scan.scans.len() != self.digits.len() {
            return Err(LcdError::CalibrationLength {
                expected: self.digits.len(),
                got: scan.scans.len(),
            });
        }
        let masks = scan.masks();
        self.calibrate(&scan.scans, &masks);
        crate::log_verbose(&format!("Calibrated from scan {:?}", scan.text));
        Ok(())
    }

    fn calibrate(&mut self, scans: &[DigitScan], masks: &[u8]) {
        let anchor = self.options.anchor_off_baseline;
        let mut on_levels: Vec<i64> = Vec::new();
        let mut off_samples: Vec<i64> = Vec::new();

        for (digit, (scan, &mask)) in self.digits.iter().zip(scans.iter().zip(masks)) {
            let levels = &mut self.current.digits[digit.index];
            off_samples.push(scan.off as i64);
            for (i, seg) in levels.segments.iter_mut().enumerate() {
                if mask & (1 << i) != 0 {
                    seg.max.add(scan.segments[i]);
                    if anchor {
                        seg.min.add(scan.off);
                    }
                    on_levels.push(seg.max.value() as i64);
                } else {
                    seg.min.add(scan.segments[i]);
                }
            }
        }

        // Segments that have never been seen on (or off) still need both
        // levels for a threshold.
        let avg = |v: &[i64]| (!v.is_empty()).then(|| (v.iter().sum::<i64>() / v.len() as i64) as i32);
        let on_avg = avg(&on_levels);
        let off_avg = avg(&off_samples);
        for levels in self.current.digits.iter_mut() {
            for seg in levels.segments.iter_mut() {
                if let Some(v) = on_avg {
                    seg.max.set(v);
                }
                if let Some(v) = off_avg {
                    seg.min.set(v);
                }
            }
        }

        self.current.update_thresholds(self.options.threshold_percent);
        self.current_saved = true;
    }

    /// Records that the last decode looked right.
    pub fn good(&mut self) {
        self.current.good += 1;
    }

    /// Records that the last decode looked wrong.
    pub fn bad(&mut self) {
        self.current.bad += 1;
    }

    /// Scores the current set, files it in the population, then switches
    /// to the best set available.
    pub fn recalibrate(&mut self) {
        self.current.update_quality();
        let quality = self.current.quality;
        crate::log(&format!(
            "Recalibrate: quality {} (good {}, bad {}), population {}/{}",
            quality,
            self.current.good,
            self.current.bad,
            self.population.len(),
            self.population.capacity()
        ));

        let current = std::mem::take(&mut self.current);
        let free = self.population.capacity() - self.population.len();
        if free >= 2 {
            // Keep a copy so these levels survive further drift
            self.population.insert(current.fresh_copy());
            self.population.insert(current);
        } else if free == 1 {
            self.population.insert(current);
        } else {
            match self.population.worst_quality() {
                Some(worst) if quality > worst => {
                    if let Some(evicted) = self.population.evict_worst() {
                        crate::log(&format!("Evicted calibration with quality {}", evicted.quality));
                    }
                    self.population.insert(current);
                }
                _ => {
                    crate::log_verbose(&format!("Discarding calibration with quality {}", quality));
                }
            }
        }
        if !self.pick_calibration() {
            // Nothing to pick from; only reachable with an empty population
            self.current = LevelsSet::blank(self.digits.len(), self.options.history);
        }
    }

    /// Makes one of the best sets in the population current, removing it
    /// from the population. Returns false if the population is empty.
    pub fn pick_calibration(&mut self) -> bool {
        match self.population.take_best() {
            Some(mut best) => {
                best.reset_counts();
                best.update_thresholds(self.options.threshold_percent);
                crate::log_verbose(&format!(
                    "Picked calibration with quality {} ({} left)",
                    best.quality,
                    self.population.len()
                ));
                self.current = best;
                self.current_saved = true;
                true
            }
            None => {
                crate::log("Warning: No calibration to pick");
                false
            }
        }
    }

    /// Writes up to `max_entries` calibration sets, best first. The current
    /// set is included once it has been calibrated or picked. Returns the
    /// number of sets written.
    pub fn save<W: Write>(&self, w: W, max_entries: usize) -> Result<usize> {
        let mut sets = self.population.ranked();
        if self.current_saved {
            // Ahead of population entries of equal quality
            let at = sets.partition_point(|s| s.quality > self.current.quality);
            sets.insert(at, &self.current);
        }
        sets.truncate(max_entries);
        write_levels(w, &sets)?;
        Ok(sets.len())
    }

    /// Replaces the population with the sets read from `r` and returns how
    /// many were read. The current set stays in use but is no longer saved
    /// until it is recalibrated or replaced.
    pub fn restore<R: BufRead>(&mut self, r: R) -> Result<usize> {
        let sets = read_levels(
            r,
            self.digits.len(),
            self.options.history,
            self.options.max_levels,
            self.options.threshold_percent,
        )?;
        let count = sets.len();
        self.population.clear();
        for set in sets {
            self.population.insert(set);
        }
        self.current_saved = false;
        crate::log(&format!("Restored {} calibration sets", count));
        Ok(count)
    }

    /// Saves the best `saved_levels` sets to a file.
    pub fn save_to_path(&self, path: &Path) -> Result<usize> {
        let file = File::create(path)?;
        let count = self.save(BufWriter::new(file), self.options.saved_levels)?;
        crate::log(&format!("Saved {} calibration sets to {}", count, path.display()));
        Ok(count)
    }

    pub fn restore_from_path(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        self.restore(BufReader::new(file))
    }
}
