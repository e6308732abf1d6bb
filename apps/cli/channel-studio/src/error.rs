use studio_core::error::{AuthError, ConfigError, CoreError, HistoryError, JobError};

use common::ErrorLocation;
use models::{ClassifiedError, ErrorKind};

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the command-line front end.
///
/// Generation failures carry the classified, user-safe message; everything
/// else keeps the underlying error and its location for the log file.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from this app
    #[error("Channel Studio Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Bad command-line input (unreadable image, unsupported format)
    #[error("Input Error: {message} {location}")]
    Input {
        message: String,
        location: ErrorLocation,
    },

    /// Error from studio-core (config, history, storage)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A job ended without an artifact
    #[error("Generation failed ({kind}): {message}")]
    Generation { kind: ErrorKind, message: String },
}

impl CliError {
    #[track_caller]
    pub fn app(message: impl Into<String>) -> Self {
        CliError::App {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn input(message: impl Into<String>) -> Self {
        CliError::Input {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn generation(error: &ClassifiedError) -> Self {
        CliError::Generation {
            kind: error.kind(),
            message: error.message().to_string(),
        }
    }

    /// Text printed to the terminal. Locations stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            CliError::App { message, .. } | CliError::Input { message, .. } => message.clone(),
            CliError::Core(error) => error.to_string(),
            CliError::Generation { message, .. } => message.clone(),
        }
    }

    /// 2 for a job that ran and failed, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Generation { .. } => 2,
            _ => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Core(error.into())
    }
}

impl From<HistoryError> for CliError {
    fn from(error: HistoryError) -> Self {
        CliError::Core(error.into())
    }
}

impl From<AuthError> for CliError {
    fn from(error: AuthError) -> Self {
        CliError::Core(error.into())
    }
}

impl From<JobError> for CliError {
    fn from(error: JobError) -> Self {
        CliError::Core(error.into())
    }
}
