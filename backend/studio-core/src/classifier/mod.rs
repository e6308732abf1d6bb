//! Maps any failure onto the user-facing [`ErrorKind`] taxonomy.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. quota / rate-limit wording or HTTP 429 -> [`ErrorKind::RateLimited`]
//! 2. credential wording or HTTP 401/403 -> [`ErrorKind::AuthMissing`] / [`ErrorKind::AuthInvalid`]
//! 3. connectivity wording, transport failure or HTTP 502-504 -> [`ErrorKind::RemoteUnavailable`]
//! 4. [`ModelError`] -> [`ErrorKind::InvalidInput`], message kept verbatim
//! 5. [`JobTimeout`] -> [`ErrorKind::Timeout`]
//! 6. anything else -> [`ErrorKind::Unknown`]
//!
//! Only our own validation messages reach the user unchanged. Everything else
//! gets a fixed message; the original error rides along as `cause`.

mod patterns;

use crate::error::{AuthError, JobTimeout, RemoteError};

use models::{ClassifiedError, ErrorKind, ModelError};

use std::error::Error as StdError;
use std::sync::Arc;

pub const RATE_LIMITED_MESSAGE: &str = "The AI service quota has been reached. This is usually \
     temporary; please wait a minute and try again.";
pub const AUTH_MISSING_MESSAGE: &str =
    "No API key is configured. Set GEMINI_API_KEY (or add it to a .env file) and try again.";
pub const AUTH_INVALID_MESSAGE: &str =
    "The API key was rejected by the AI service. Check that it is correct and still active.";
pub const REMOTE_UNAVAILABLE_MESSAGE: &str =
    "Could not reach the AI service. Check your internet connection and try again.";
pub const TIMEOUT_MESSAGE: &str = "The generation took too long and was stopped. Please try again.";
pub const UNKNOWN_MESSAGE: &str =
    "Something went wrong while generating your asset. Please try again.";

pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify `raw`. Never fails.
    pub fn classify<E>(raw: E) -> ClassifiedError
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        let cause: Arc<dyn StdError + Send + Sync> = Arc::from(raw.into());
        let (kind, message) = Self::kind_and_message(cause.as_ref());

        ClassifiedError::new(kind, message).with_cause(cause)
    }

    fn kind_and_message(error: &(dyn StdError + Send + Sync + 'static)) -> (ErrorKind, String) {
        let kind = Self::kind_of(error);
        let message = match kind {
            ErrorKind::InvalidInput => match error.downcast_ref::<ModelError>() {
                Some(validation) => validation.message().to_string(),
                None => UNKNOWN_MESSAGE.to_string(),
            },
            other => fixed_message(other).to_string(),
        };

        (kind, message)
    }

    fn kind_of(error: &(dyn StdError + Send + Sync + 'static)) -> ErrorKind {
        let remote = error.downcast_ref::<RemoteError>();
        let status = remote.and_then(RemoteError::status_code);
        let text = message_text(error);

        if patterns::rate_limit().is_match(&text) || status.is_some_and(|s| s.is_rate_limited()) {
            return ErrorKind::RateLimited;
        }

        match error.downcast_ref::<AuthError>() {
            Some(AuthError::Missing { .. }) => return ErrorKind::AuthMissing,
            Some(AuthError::Invalid { .. }) => return ErrorKind::AuthInvalid,
            Some(AuthError::EnvLoad { .. }) | None => {}
        }
        if matches!(remote, Some(RemoteError::Auth { .. })) {
            return ErrorKind::AuthMissing;
        }
        let mentions_credential = patterns::credential().is_match(&text);
        if mentions_credential && patterns::auth_invalid().is_match(&text) {
            return ErrorKind::AuthInvalid;
        }
        if mentions_credential && patterns::auth_missing().is_match(&text) {
            return ErrorKind::AuthMissing;
        }
        if patterns::auth_rejected().is_match(&text) || status.is_some_and(|s| s.is_auth_failure()) {
            return ErrorKind::AuthInvalid;
        }

        if patterns::network().is_match(&text)
            || remote.is_some_and(RemoteError::is_transport_failure)
            || status.is_some_and(|s| s.is_unavailable())
        {
            return ErrorKind::RemoteUnavailable;
        }

        if error.downcast_ref::<ModelError>().is_some() {
            return ErrorKind::InvalidInput;
        }

        if error.downcast_ref::<JobTimeout>().is_some() {
            return ErrorKind::Timeout;
        }

        ErrorKind::Unknown
    }
}

pub fn fixed_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::RateLimited => RATE_LIMITED_MESSAGE,
        ErrorKind::AuthMissing => AUTH_MISSING_MESSAGE,
        ErrorKind::AuthInvalid => AUTH_INVALID_MESSAGE,
        ErrorKind::RemoteUnavailable => REMOTE_UNAVAILABLE_MESSAGE,
        ErrorKind::Timeout => TIMEOUT_MESSAGE,
        ErrorKind::InvalidInput | ErrorKind::Unknown => UNKNOWN_MESSAGE,
    }
}

/// Lowercased text of `error` and its whole source chain.
///
/// Typed remote errors contribute their bare message so the location suffix
/// cannot produce false matches.
fn message_text(error: &(dyn StdError + 'static)) -> String {
    let mut text = String::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        if !text.is_empty() {
            text.push_str(" | ");
        }
        match err.downcast_ref::<RemoteError>() {
            Some(remote) => text.push_str(remote.message()),
            None => text.push_str(&err.to_string()),
        }
        current = err.source();
    }

    text.to_lowercase()
}
