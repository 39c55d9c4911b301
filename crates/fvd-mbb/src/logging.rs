use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Module prefix the loggers accept; dependency crates stay quiet.
const LOG_TARGET_PREFIX: &str = "fvd";

/// Once the log exceeds `max_log_size`, drop the oldest lines so at most
/// half of it remains. Returns whether the file was trimmed.
fn rotate_log(log_path: &Path, max_log_size: u64) -> io::Result<bool> {
    let size = match std::fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };
    if size <= max_log_size {
        return Ok(false);
    }

    let contents = std::fs::read(log_path)?;
    let budget = usize::try_from(max_log_size / 2).unwrap_or(usize::MAX);
    let cut = contents.len().saturating_sub(budget);
    let keep_from = match contents[cut..].iter().position(|&byte| byte == b'\n') {
        Some(newline) if cut > 0 => cut + newline + 1,
        _ => cut,
    };
    crate::persist::write_atomic(log_path, &contents[keep_from..])?;
    Ok(true)
}

fn open_log_file(log_path: &Path) -> io::Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(log_path)
}

fn level_for(debug_enabled: bool) -> LevelFilter {
    if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Log to `log_path`, and to stderr in debug builds or when `verbose` is set.
/// A log file that cannot be opened only disables file logging.
pub fn init_logging(log_path: &Path, debug_enabled: bool, verbose: bool, max_log_size: u64) {
    let rotated = rotate_log(log_path, max_log_size);

    let level = level_for(debug_enabled);
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str(LOG_TARGET_PREFIX)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if verbose || cfg!(debug_assertions) {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    let file_error = match open_log_file(log_path) {
        Ok(file) => {
            loggers.push(WriteLogger::new(level, config, file));
            None
        }
        Err(error) => Some(error),
    };

    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
    set_log_level(debug_enabled);

    match rotated {
        Ok(true) => log::debug!("Trimmed log file {}", log_path.display()),
        Ok(false) => {}
        Err(error) => log::warn!("Could not trim log file {}: {error}", log_path.display()),
    }
    if let Some(error) = file_error {
        log::warn!("File logging disabled for {}: {error}", log_path.display());
    }
}

pub fn set_log_level(debug_enabled: bool) {
    log::set_max_level(level_for(debug_enabled));
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{open_log_file, rotate_log, set_log_level};

    #[test]
    fn oversized_log_keeps_whole_recent_lines() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        let lines: String = (1..=10).map(|n| format!("entry {n:02}\n")).collect();
        std::fs::write(&log_path, &lines).expect("test log file should be written");

        assert!(rotate_log(&log_path, 40).expect("rotation should succeed"));

        let kept = std::fs::read_to_string(&log_path).expect("log file should be readable");
        assert!(kept.len() <= 20);
        assert!(kept.ends_with("entry 10\n"));
        assert!(kept.lines().all(|line| line.starts_with("entry ")));
        assert!(!kept.contains("entry 01"));
    }

    #[test]
    fn log_within_limit_is_untouched() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        std::fs::write(&log_path, "short\n").expect("test log file should be written");

        assert!(!rotate_log(&log_path, 1024).expect("rotation should succeed"));
        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log file should be readable"),
            "short\n"
        );
    }

    #[test]
    fn missing_log_is_not_an_error() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");

        assert!(!rotate_log(&temp_dir.path().join("absent.log"), 10).expect("no error"));
    }

    #[test]
    fn existing_log_file_is_appended_to() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("data").join("debug.log");
        std::fs::create_dir_all(log_path.parent().expect("parent")).expect("create dir");
        std::fs::write(&log_path, "old\n").expect("seed log file");

        let mut file = open_log_file(&log_path).expect("log file should open");
        file.write_all(b"new\n").expect("append should succeed");

        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log file should be readable"),
            "old\nnew\n"
        );
    }

    #[test]
    fn set_log_level_updates_global_level() {
        set_log_level(true);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);

        set_log_level(false);
        assert_eq!(log::max_level(), log::LevelFilter::Info);
    }
}
