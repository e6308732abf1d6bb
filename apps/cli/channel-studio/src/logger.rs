//! Logging for the channel-studio binary.
//!
//! Colored output on stderr (stdout is reserved for command results) plus a
//! plain log file. Initialization runs at most once per process.

use crate::error::CliError;

use std::fs::File;
use std::io::stderr;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

static INIT_LOGGER_ONCE: Once = Once::new();

static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "channel-studio.log";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

#[cfg(debug_assertions)]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the global logger, writing `channel-studio.log` into `log_dir`.
///
/// `terminal_level` filters what reaches stderr; the file always gets
/// [`DEFAULT_LOG_LEVEL`]. Later calls log a warning and return `Ok`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or another logger was
/// installed first.
pub fn initialize(log_dir: &Path, terminal_level: LevelFilter) -> Result<(), CliError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir, terminal_level);
        if result.is_ok() {
            info!("Logger initialized (file: {DEFAULT_LOG_LEVEL:?}, terminal: {terminal_level:?})");
        }
    });

    result
}

/// Create the log directory and open the log file for appending.
#[track_caller]
pub fn open_log_file(log_dir: &Path) -> Result<File, CliError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        CliError::app(format!(
            "Failed to create log directory {}: {e}",
            log_dir.display()
        ))
    })?;

    fern::log_file(log_dir.join(LOG_FILE_NAME))
        .map_err(|e| CliError::app(format!("Failed to create log file: {e}")))
}

#[track_caller]
fn initialize_internal(log_dir: &Path, terminal_level: LevelFilter) -> Result<(), CliError> {
    let log_file = open_log_file(log_dir)?;

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let terminal_dispatch = Dispatch::new()
        .level(terminal_level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
            ))
        })
        .chain(stderr());

    let file_dispatch = Dispatch::new()
        .level(DEFAULT_LOG_LEVEL)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(log_file);

    Dispatch::new()
        .level(DEFAULT_LOG_LEVEL.max(terminal_level))
        // Dependencies are chatty at debug
        .level_for("reqwest", LevelFilter::Info)
        .level_for("hyper_util", LevelFilter::Info)
        .chain(terminal_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| CliError::app(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}
