//! Shared building blocks for Channel Studio.
//!
//! Everything here is dependency-light and used by every other crate:
//!
//! - [`ErrorLocation`]: call-site capture attached to every error variant
//! - [`RedactedApiKey`]: an API key that refuses to print or serialize itself
//! - [`HttpStatusCode`]: status helpers used when classifying remote failures

pub mod error;
pub mod http_status;
pub mod redacted_key;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_key::RedactedApiKey;

#[cfg(test)]
mod tests;
