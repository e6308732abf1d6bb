// Logger initialization: idempotence and file errors

use crate::logger::{LOG_FILE_NAME, initialize, open_log_file};

use std::path::PathBuf;

use log::LevelFilter;
use tempfile::TempDir;

/// **VALUE**: Calling initialize() twice neither panics nor fails.
///
/// **WHY THIS MATTERS**: fern panics or errors when a second global logger is
/// installed; a stray second call must not crash the CLI.
///
/// **BUG THIS CATCHES**: Would catch removal of the Once/AtomicBool guards.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN
    let temp_dir = TempDir::new().unwrap();

    // WHEN
    let first = initialize(temp_dir.path(), LevelFilter::Warn);
    let second = initialize(temp_dir.path(), LevelFilter::Warn);

    // THEN
    assert!(first.is_ok(), "First initialization should succeed");
    assert!(second.is_ok(), "Second initialization should be a no-op");
}

/// **VALUE**: An unwritable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_log_file_opened_then_app_error() {
    // GIVEN: A path under a file, which can never be a directory
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN
    let result = open_log_file(&invalid_dir);

    // THEN
    let err = result.unwrap_err();
    assert!(
        format!("{err:?}").contains("App"),
        "Error should be CliError::App"
    );
}

#[test]
fn given_missing_log_dir_when_log_file_opened_then_directory_and_file_created() {
    // GIVEN
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("data").join("logs");

    // WHEN
    let result = open_log_file(&log_dir);

    // THEN
    assert!(result.is_ok());
    assert!(log_dir.join(LOG_FILE_NAME).exists());
}
