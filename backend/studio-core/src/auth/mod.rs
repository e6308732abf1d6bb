//! API key discovery.
//!
//! Looks for a `.env` file in the working directory, then next to the
//! executable, and reads the configured variable from the environment. The
//! key is validated and wrapped in [`RedactedApiKey`] before anything else
//! sees it; it is never logged.

pub mod validation;

use crate::error::AuthError;

use common::RedactedApiKey;
use validation::KeyValidator;

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

/// Outcome of the `.env` lookup.
#[derive(Debug)]
pub struct EnvLoadResult {
    pub path: Option<PathBuf>,
    pub loaded: bool,
}

/// Load and validate the API key stored in `env_var`.
///
/// A missing `.env` file is not an error; a missing variable is.
pub fn load_api_key(env_var: &str) -> Result<RedactedApiKey, AuthError> {
    let env_result = try_load_dotenv();
    if !env_result.loaded {
        debug!("No .env file found, checking process environment only");
    }

    read_api_key(env_var)
}

/// Read and validate `env_var` without touching `.env` files.
pub fn read_api_key(env_var: &str) -> Result<RedactedApiKey, AuthError> {
    match env::var(env_var) {
        Ok(value) if value.trim().is_empty() => {
            debug!("{env_var} is set but empty");
            Err(AuthError::missing(env_var))
        }
        Ok(value) => {
            let key = KeyValidator::google(env_var)
                .validate_and_wrap(value)
                .inspect_err(|e| warn!("Rejected API key from {env_var}: {e}"))?;
            info!("Found API key in {env_var} ({} chars)", key.len());
            Ok(key)
        }
        Err(env::VarError::NotPresent) => Err(AuthError::missing(env_var)),
        Err(env::VarError::NotUnicode(_)) => Err(AuthError::env_load(format!(
            "{env_var} contains invalid unicode"
        ))),
    }
}

fn try_load_dotenv() -> EnvLoadResult {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {path:?}");
        return EnvLoadResult {
            path: Some(path),
            loaded: true,
        };
    }

    if let Ok(exe_path) = env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let env_path = exe_dir.join(".env");
        if env_path.exists() {
            match dotenvy::from_path(&env_path) {
                Ok(()) => {
                    info!("Loaded .env from: {env_path:?}");
                    return EnvLoadResult {
                        path: Some(env_path),
                        loaded: true,
                    };
                }
                Err(e) => warn!("Failed to parse .env at {env_path:?}: {e}"),
            }
        }
    }

    EnvLoadResult {
        path: None,
        loaded: false,
    }
}
