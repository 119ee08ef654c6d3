//! Logging module for rusniff-rules
//!
//! Provides opt-in logging of ruleset loading and per-stream check runs for
//! debugging and verification purposes. Disabled until `init_logger` is
//! called; all logging helpers are no-ops before that.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<CheckLogger>> = Mutex::new(None);

/// Logger for sniff check runs
pub struct CheckLogger {
    file: File,
}

impl CheckLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/rusniff-{}.log", timestamp))
    });

    let logger = CheckLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Log the start of a check run over one stream
pub fn log_check_start(token_count: usize, sniff_count: usize) {
    section("CHECK START");
    log(&format!(
        "Checking {} tokens with {} sniffs",
        token_count, sniff_count
    ));
}

/// Log the result of a check run
pub fn log_check_complete(errors: usize, warnings: usize) {
    log(&format!(
        "Check complete: {} errors, {} warnings",
        errors, warnings
    ));
}
