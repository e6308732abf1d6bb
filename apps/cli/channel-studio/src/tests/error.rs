use crate::error::CliError;

use studio_core::error::{ConfigError, CoreError};

use models::{ClassifiedError, ErrorKind};

/// **VALUE**: Terminal output never includes source locations.
///
/// **WHY THIS MATTERS**: `file:line` suffixes are for the log file; users
/// should see the classified message only.
///
/// **BUG THIS CATCHES**: Would catch `user_message` falling back to
/// `to_string()`, which appends the location.
#[test]
fn given_generation_error_when_shown_to_user_then_only_classified_message() {
    // GIVEN
    let classified = ClassifiedError::new(ErrorKind::RateLimited, "Quota reached.");

    // WHEN
    let err = CliError::generation(&classified);

    // THEN
    assert_eq!(err.user_message(), "Quota reached.");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn given_input_error_when_shown_to_user_then_message_without_location() {
    // GIVEN
    let err = CliError::input("Unsupported image format: logo.gif");

    // WHEN
    let shown = err.user_message();

    // THEN
    assert_eq!(shown, "Unsupported image format: logo.gif");
    assert!(err.to_string().contains(file!()), "Display keeps the location");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn given_config_error_when_converted_then_wrapped_as_core_error() {
    // GIVEN
    let config_error = ConfigError::validation("history.capacity must be >= 1");

    // WHEN
    let err = CliError::from(config_error);

    // THEN
    assert!(matches!(err, CliError::Core(CoreError::Config(_))));
    assert!(err.user_message().contains("history.capacity"));
}
