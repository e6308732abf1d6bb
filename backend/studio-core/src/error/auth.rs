//! Errors raised while locating and validating the API key.

use common::ErrorLocation;
use std::panic::Location;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("No API key configured: set {env_var} in the environment or a .env file {location}")]
    Missing {
        env_var: String,
        location: ErrorLocation,
    },

    #[error("API key in {env_var} is invalid: {reason} {location}")]
    Invalid {
        env_var: String,
        reason: KeyValidationFailure,
        location: ErrorLocation,
    },

    #[error("Environment load failed: {message} {location}")]
    EnvLoad {
        message: String,
        location: ErrorLocation,
    },
}

/// Specific reasons an API key is rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidationFailure {
    Empty,
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    InvalidPrefix { expected: &'static str, actual: String },
    PlaceholderDetected { pattern: &'static str },
    InvalidCharacters,
}

impl std::fmt::Display for KeyValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "key is empty"),
            Self::TooShort { min, actual } => {
                write!(f, "key too short ({actual} chars, minimum {min})")
            }
            Self::TooLong { max, actual } => {
                write!(f, "key too long ({actual} chars, maximum {max})")
            }
            Self::InvalidPrefix { expected, actual } => {
                write!(f, "expected prefix '{expected}', got '{actual}'")
            }
            Self::PlaceholderDetected { pattern } => {
                write!(f, "looks like a placeholder ('{pattern}')")
            }
            Self::InvalidCharacters => write!(f, "contains invalid characters"),
        }
    }
}

impl AuthError {
    #[track_caller]
    pub fn missing(env_var: impl Into<String>) -> Self {
        AuthError::Missing {
            env_var: env_var.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid(env_var: impl Into<String>, reason: KeyValidationFailure) -> Self {
        AuthError::Invalid {
            env_var: env_var.into(),
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn env_load(message: impl Into<String>) -> Self {
        AuthError::EnvLoad {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
