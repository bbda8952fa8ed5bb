use std::path::PathBuf;
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the default decoder config: `<exe_dir>/lcd.json`
pub fn default_config_path() -> PathBuf {
    get_exe_dir().join("lcd.json")
}

/// Returns the default calibration file: `<exe_dir>/calibration.txt`
pub fn default_levels_path() -> PathBuf {
    get_exe_dir().join("calibration.txt")
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the log file: `<exe_dir>/logs/meterman-lcd.log`
pub fn get_log_file() -> PathBuf {
    get_logs_dir().join("meterman-lcd.log")
}

/// Ensures output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_exe_dir() {
        let dir = get_exe_dir();
        assert!(default_config_path().starts_with(dir));
        assert!(default_levels_path().starts_with(dir));
        assert_eq!(get_log_file().parent(), Some(get_logs_dir().as_path()));
    }
}
