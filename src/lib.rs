//! MeterMan LCD decoder
//!
//! Reads seven-segment LCD and LED displays from camera images. Digits are
//! described by templates placed at fixed image positions; each segment is
//! sampled, compared against self-tuning thresholds and mapped to a
//! character. Calibration sets are scored from good/bad feedback and the
//! best ones are kept and persisted.

pub mod calibration;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lcd;
pub mod paths;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

pub use config::{DecoderOptions, LcdConfig};
pub use error::{LcdError, Result};
pub use lcd::{DecodeResult, DigitDecode, DigitScan, LcdDecoder};

static VERBOSE: AtomicBool = AtomicBool::new(false);
static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

/// Enables or disables `log_verbose` output.
pub fn set_verbose(on: bool) {
    VERBOSE.store(on, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Also appends log lines to `path`. Only the first call takes effect.
pub fn set_log_file(path: PathBuf) {
    let _ = LOG_FILE.set(path);
}

/// Logs a message to stderr and the log file with a timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let Some(path) = LOG_FILE.get() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(line.as_bytes());
    }
}

/// Logs a message only when verbose output is enabled.
pub fn log_verbose(msg: &str) {
    if is_verbose() {
        log(msg);
    }
}
