#![deny(missing_docs)]
//! Shared logging utilities for the popcorn workspace.
//!
//! This crate provides the `popcorn_*` logging macros used across the codebase,
//! the logger setup for the terminal front-end and a minimal test initializer.

use std::fs::File;
use std::path::{Path, PathBuf};

#[doc(hidden)]
pub use log;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./popcorn.log";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! popcorn_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! popcorn_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! popcorn_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! popcorn_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! popcorn_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file, truncating it on startup.
    File(PathBuf),
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both the file and the terminal.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

/// Initialize the global logger.
///
/// The terminal front-end renders to stdout, so the default destination is a
/// file. Returns `false` if no logger could be installed, either because the
/// file could not be created or a logger was already set.
pub fn initialize(destination: LogDestination, level: LevelFilter) -> bool {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return false,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )],
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(&path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    CombinedLogger::init(loggers).is_ok()
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
