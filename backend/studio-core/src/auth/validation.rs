//! API key format checks, run before any request leaves the process.

use crate::error::{AuthError, KeyValidationFailure};
use common::RedactedApiKey;

const GOOGLE_KEY_PREFIX: &str = "AI";
const GOOGLE_KEY_MIN_LEN: usize = 30;
const GOOGLE_KEY_MAX_LEN: usize = 100;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(KeyValidationFailure),
}

/// Shape rules for one API key source.
pub struct KeyValidator {
    /// Env var name, used in error messages.
    source: String,
    expected_prefix: Option<&'static str>,
    min_length: usize,
    max_length: usize,
}

impl KeyValidator {
    /// Rules for Google AI Studio keys.
    pub fn google(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            expected_prefix: Some(GOOGLE_KEY_PREFIX),
            min_length: GOOGLE_KEY_MIN_LEN,
            max_length: GOOGLE_KEY_MAX_LEN,
        }
    }

    pub fn validate(&self, key: &str) -> ValidationResult {
        let trimmed = key.trim();
        let length = trimmed.chars().count();

        if trimmed.is_empty() {
            return ValidationResult::Invalid(KeyValidationFailure::Empty);
        }

        if length < self.min_length {
            return ValidationResult::Invalid(KeyValidationFailure::TooShort {
                min: self.min_length,
                actual: length,
            });
        }

        if length > self.max_length {
            return ValidationResult::Invalid(KeyValidationFailure::TooLong {
                max: self.max_length,
                actual: length,
            });
        }

        if let Some(expected) = self.expected_prefix
            && !trimmed.starts_with(expected)
        {
            let actual: String = trimmed.chars().take(expected.len()).collect();
            return ValidationResult::Invalid(KeyValidationFailure::InvalidPrefix {
                expected,
                actual,
            });
        }

        if let Some(pattern) = detect_placeholder(trimmed) {
            return ValidationResult::Invalid(KeyValidationFailure::PlaceholderDetected { pattern });
        }

        if !is_valid_key_chars(trimmed) {
            return ValidationResult::Invalid(KeyValidationFailure::InvalidCharacters);
        }

        ValidationResult::Valid
    }

    /// Validate and wrap, consuming the raw value.
    #[track_caller]
    pub fn validate_and_wrap(&self, key: String) -> Result<RedactedApiKey, AuthError> {
        match self.validate(&key) {
            ValidationResult::Valid => Ok(RedactedApiKey::new(key)),
            ValidationResult::Invalid(reason) => {
                // RedactedApiKey zeroizes the rejected value on drop
                drop(RedactedApiKey::new(key));
                Err(AuthError::invalid(&self.source, reason))
            }
        }
    }
}

fn detect_placeholder(key: &str) -> Option<&'static str> {
    let lower = key.to_lowercase();

    static PATTERNS: &[(&str, &str)] = &[
        ("...", "ellipsis"),
        ("your-api-key", "your-api-key"),
        ("your_api_key", "your_api_key"),
        ("yourapikey", "yourapikey"),
        ("<your", "<your...>"),
        ("insert", "insert"),
        ("xxx", "xxx"),
        ("placeholder", "placeholder"),
        ("example", "example"),
        ("changeme", "changeme"),
        ("dummy", "dummy"),
        ("replace", "replace"),
    ];

    if let Some((_, name)) = PATTERNS.iter().find(|(pattern, _)| lower.contains(pattern)) {
        return Some(name);
    }

    let mut chars = key.chars();
    if let Some(first) = chars.next()
        && key.len() >= 10
        && chars.all(|c| c == first)
    {
        return Some("repeated_char");
    }

    None
}

/// Alphanumeric plus `-` and `_`, the alphabet Google keys are drawn from.
fn is_valid_key_chars(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}
