//! API key wrapper that never exposes its value in logs, debug output or
//! serialized documents.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

const REDACTED_DEBUG: &str = "RedactedApiKey([REDACTED])";
const REDACTED_DISPLAY: &str = "[REDACTED API KEY]";

/// An API key for the generation service.
///
/// Surrounding whitespace is stripped on construction (keys pasted into
/// `.env` files frequently carry a trailing newline). The buffer is zeroed
/// on drop.
#[derive(Clone)]
pub struct RedactedApiKey {
    inner: String,
}

impl RedactedApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        let mut raw = key.into();
        let trimmed = raw.trim().to_string();
        raw.zeroize();
        Self { inner: trimmed }
    }

    /// The actual key value.
    ///
    /// Only call this when building the outgoing request header.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Key length in characters (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED_DEBUG)
    }
}

impl fmt::Display for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED_DISPLAY)
    }
}

impl Drop for RedactedApiKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedApiKey {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from("RedactedApiKey cannot be serialized - use as_str() explicitly"),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
