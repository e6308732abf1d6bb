//! Errors raised while talking to the remote generation service.
//!
//! - HTTP status codes are stored as [`HttpStatusCode`], never re-parsed from text
//! - transport failures keep the timeout/connect flags reported by reqwest
//! - every variant carries an [`ErrorLocation`] captured with `#[track_caller]`

use common::{ErrorLocation, HttpStatusCode};
use std::panic::Location;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RemoteError {
    #[error("HTTP {status}: {message} {location}")]
    Http {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Network error: {message} {location}")]
    Network {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("API key missing: {message} {location}")]
    Auth {
        message: String,
        location: ErrorLocation,
    },

    #[error("Response decode failed: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote operation failed: {message} {location}")]
    Operation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unsupported request: {message} {location}")]
    Unsupported {
        message: String,
        location: ErrorLocation,
    },
}

impl RemoteError {
    #[track_caller]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        RemoteError::Http {
            status: HttpStatusCode(status),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        RemoteError::Network {
            message: message.into(),
            is_timeout: false,
            is_connection: false,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn auth(message: impl Into<String>) -> Self {
        RemoteError::Auth {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        RemoteError::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn operation(message: impl Into<String>) -> Self {
        RemoteError::Operation {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unsupported(message: impl Into<String>) -> Self {
        RemoteError::Unsupported {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from a reqwest error, keeping its transport category.
    #[track_caller]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let is_timeout = error.is_timeout();
        let is_connection = error.is_connect();

        if is_timeout || is_connection {
            return RemoteError::Network {
                message: error.to_string(),
                is_timeout,
                is_connection,
                location,
            };
        }

        if let Some(status) = error.status() {
            return RemoteError::Http {
                status: HttpStatusCode(status.as_u16()),
                message: error.to_string(),
                location,
            };
        }

        if error.is_decode() {
            return RemoteError::Decode {
                message: error.to_string(),
                location,
            };
        }

        RemoteError::Network {
            message: error.to_string(),
            is_timeout: false,
            is_connection: false,
            location,
        }
    }

    /// Message without the location suffix.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Http { message, .. }
            | RemoteError::Network { message, .. }
            | RemoteError::Auth { message, .. }
            | RemoteError::Decode { message, .. }
            | RemoteError::Operation { message, .. }
            | RemoteError::Unsupported { message, .. } => message,
        }
    }

    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            RemoteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the request never got an answer (timeout, refused connection).
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            RemoteError::Network {
                is_timeout: true,
                ..
            } | RemoteError::Network {
                is_connection: true,
                ..
            }
        )
    }

    pub fn error_category(&self) -> &'static str {
        match self {
            RemoteError::Http { status, .. } if status.is_client_error() => "client_error",
            RemoteError::Http { status, .. } if status.is_server_error() => "server_error",
            RemoteError::Http { .. } => "http",
            RemoteError::Network {
                is_timeout: true, ..
            } => "timeout",
            RemoteError::Network {
                is_connection: true,
                ..
            } => "connection",
            RemoteError::Network { .. } => "network",
            RemoteError::Auth { .. } => "auth",
            RemoteError::Decode { .. } => "decode",
            RemoteError::Operation { .. } => "operation",
            RemoteError::Unsupported { .. } => "unsupported",
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        RemoteError::decode(error.to_string())
    }
}

impl From<url::ParseError> for RemoteError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RemoteError::unsupported(format!("invalid URL: {error}"))
    }
}

impl From<reqwest::Error> for RemoteError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        RemoteError::from_reqwest(&error)
    }
}
