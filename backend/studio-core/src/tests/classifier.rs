// Unit tests for the error classifier rules and their ordering.

use crate::classifier::{
    AUTH_INVALID_MESSAGE, AUTH_MISSING_MESSAGE, ErrorClassifier, RATE_LIMITED_MESSAGE,
    REMOTE_UNAVAILABLE_MESSAGE, TIMEOUT_MESSAGE, UNKNOWN_MESSAGE,
};
use crate::error::{AuthError, JobTimeout, KeyValidationFailure, RemoteError};

use models::{ErrorKind, GenerationRequest};

use std::io;
use std::time::Duration;

/// **VALUE**: Verifies quota wording is recognized regardless of status code.
///
/// **WHY THIS MATTERS**: Users hitting quota need to be told to wait, not that
/// something is broken.
///
/// **BUG THIS CATCHES**: Would catch a rate-limit pattern that only matches
/// HTTP 429 and misses quota errors reported with other codes.
#[test]
fn given_quota_message_when_classified_then_rate_limited() {
    // GIVEN: A plain error mentioning quota
    let raw = io::Error::other("Quota exceeded for requests per minute");

    // WHEN: Classifying it
    let classified = ErrorClassifier::classify(raw);

    // THEN: RateLimited with the retry-later message
    assert_eq!(classified.kind(), ErrorKind::RateLimited);
    assert_eq!(classified.message(), RATE_LIMITED_MESSAGE);
    assert!(classified.message().contains("try again"));
}

#[test]
fn given_http_429_without_wording_when_classified_then_rate_limited() {
    // GIVEN: A bare 429
    let raw = RemoteError::http(429, "slow down");

    // WHEN / THEN
    assert_eq!(ErrorClassifier::classify(raw).kind(), ErrorKind::RateLimited);
}

/// **VALUE**: Rule order puts rate limiting before auth.
///
/// **BUG THIS CATCHES**: Would catch reordering the rules so that a quota
/// error mentioning the API key is reported as a credential problem.
#[test]
fn given_quota_message_mentioning_api_key_when_classified_then_rate_limited_wins() {
    // GIVEN: A message matching both rules
    let raw = RemoteError::http(400, "Quota exceeded for this API key");

    // WHEN
    let classified = ErrorClassifier::classify(raw);

    // THEN: First rule wins
    assert_eq!(classified.kind(), ErrorKind::RateLimited);
}

#[test]
fn given_api_key_invalid_message_when_classified_then_auth_invalid() {
    // GIVEN: The message the service returns for a bad key
    let raw = RemoteError::http(400, "INVALID_ARGUMENT: API key not valid. Please pass a valid API key.");

    // WHEN
    let classified = ErrorClassifier::classify(raw);

    // THEN
    assert_eq!(classified.kind(), ErrorKind::AuthInvalid);
    assert_eq!(classified.message(), AUTH_INVALID_MESSAGE);
}

#[test]
fn given_http_403_without_wording_when_classified_then_auth_invalid() {
    let raw = RemoteError::http(403, "PERMISSION_DENIED: caller does not have access");

    assert_eq!(ErrorClassifier::classify(raw).kind(), ErrorKind::AuthInvalid);
}

#[test]
fn given_http_401_saying_key_missing_when_classified_then_auth_missing() {
    // GIVEN: 401 whose text says the key is missing
    let raw = RemoteError::http(401, "API key is missing from the request");

    // WHEN / THEN: Missing wording beats the status code
    assert_eq!(ErrorClassifier::classify(raw).kind(), ErrorKind::AuthMissing);
}

/// **VALUE**: A client built without a key classifies as AuthMissing.
///
/// **BUG THIS CATCHES**: Would catch the typed `RemoteError::Auth` variant
/// falling through to Unknown when its message wording changes.
#[test]
fn given_remote_auth_error_when_classified_then_auth_missing() {
    // GIVEN
    let raw = RemoteError::auth("no credentials");

    // WHEN
    let classified = ErrorClassifier::classify(raw);

    // THEN
    assert_eq!(classified.kind(), ErrorKind::AuthMissing);
    assert_eq!(classified.message(), AUTH_MISSING_MESSAGE);
}

#[test]
fn given_typed_auth_errors_when_classified_then_mapped_by_variant() {
    let missing = ErrorClassifier::classify(AuthError::missing("GEMINI_API_KEY"));
    let invalid = ErrorClassifier::classify(AuthError::invalid(
        "GEMINI_API_KEY",
        KeyValidationFailure::TooShort { min: 30, actual: 4 },
    ));

    assert_eq!(missing.kind(), ErrorKind::AuthMissing);
    assert_eq!(invalid.kind(), ErrorKind::AuthInvalid);
}

#[test]
fn given_connection_refused_when_classified_then_remote_unavailable() {
    // GIVEN: A transport failure reported by the OS
    let raw = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");

    // WHEN
    let classified = ErrorClassifier::classify(raw);

    // THEN
    assert_eq!(classified.kind(), ErrorKind::RemoteUnavailable);
    assert_eq!(classified.message(), REMOTE_UNAVAILABLE_MESSAGE);
}

#[test]
fn given_http_503_when_classified_then_remote_unavailable() {
    let raw = RemoteError::http(503, "The model is overloaded");

    assert_eq!(
        ErrorClassifier::classify(raw).kind(),
        ErrorKind::RemoteUnavailable
    );
}

#[test]
fn given_flagged_transport_failure_when_classified_then_remote_unavailable() {
    // GIVEN: A network error whose text has no connectivity tokens
    let raw = RemoteError::Network {
        message: "operation aborted".to_string(),
        is_timeout: true,
        is_connection: false,
        location: common::ErrorLocation::caller(),
    };

    // WHEN / THEN: The flag alone is enough
    assert_eq!(
        ErrorClassifier::classify(raw).kind(),
        ErrorKind::RemoteUnavailable
    );
}

/// **VALUE**: Our own validation messages reach the user unchanged.
///
/// **WHY THIS MATTERS**: They tell the user exactly which field is missing.
///
/// **BUG THIS CATCHES**: Would catch validation errors being replaced by the
/// generic fallback message.
#[test]
fn given_validation_error_when_classified_then_invalid_input_with_verbatim_message() {
    // GIVEN: An empty logo prompt
    let error = GenerationRequest::logo("").validate().unwrap_err();
    let expected = error.message().to_string();

    // WHEN
    let classified = ErrorClassifier::classify(error);

    // THEN
    assert_eq!(classified.kind(), ErrorKind::InvalidInput);
    assert_eq!(classified.message(), expected);
}

#[test]
fn given_job_timeout_when_classified_then_timeout() {
    let classified = ErrorClassifier::classify(JobTimeout::new(Duration::from_secs(600), 60));

    assert_eq!(classified.kind(), ErrorKind::Timeout);
    assert_eq!(classified.message(), TIMEOUT_MESSAGE);
}

/// **VALUE**: Unknown failures never echo raw text.
///
/// **WHY THIS MATTERS**: Raw errors may contain internal URLs or payloads.
///
/// **BUG THIS CATCHES**: Would catch the fallback path copying the original
/// message into the user-facing one.
#[test]
fn given_unrecognized_error_when_classified_then_unknown_generic_message_and_cause_kept() {
    // GIVEN: An opaque error
    let raw = io::Error::other("internal stack frame 0xdeadbeef");

    // WHEN
    let classified = ErrorClassifier::classify(raw);

    // THEN: Generic message, original kept as cause
    assert_eq!(classified.kind(), ErrorKind::Unknown);
    assert_eq!(classified.message(), UNKNOWN_MESSAGE);
    assert!(!classified.message().contains("deadbeef"));
    let cause = classified.cause().expect("cause should be kept");
    assert!(cause.to_string().contains("deadbeef"));
    assert!(!classified.to_string().contains("deadbeef"));
}

#[test]
fn given_location_suffix_when_classified_then_not_used_for_matching() {
    // GIVEN: A remote error whose only text is neutral
    let raw = RemoteError::decode("unexpected field");

    // WHEN / THEN: Source file path in the location does not leak into matching
    assert_eq!(ErrorClassifier::classify(raw).kind(), ErrorKind::Unknown);
}
