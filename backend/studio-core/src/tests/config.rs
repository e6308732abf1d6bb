// Unit tests for StudioConfig load/save/validate.

use crate::config::StudioConfig;
use crate::error::ConfigError;

use std::time::Duration;

use tempfile::TempDir;

#[test]
fn given_missing_file_when_loaded_then_defaults() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().unwrap();

    // WHEN
    let config = StudioConfig::load(dir.path()).unwrap();

    // THEN: Defaults match the documented values
    assert_eq!(config, StudioConfig::default());
    assert_eq!(config.polling.interval_secs, 10);
    assert_eq!(config.polling.max_wait_secs, 600);
    assert_eq!(config.history.capacity, 50);
    assert_eq!(config.remote.video_model, "veo-3.1-fast-generate-preview");
    assert_eq!(
        config.remote.base_url,
        "https://generativelanguage.googleapis.com/v1beta/"
    );
}

/// **VALUE**: Saved config loads back identically.
///
/// **BUG THIS CATCHES**: Would catch a field missing `#[serde(default)]` or a
/// TOML serialization that cannot be parsed back.
#[test]
fn given_customized_config_when_saved_and_loaded_then_identical() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let mut config = StudioConfig::default();
    config.history.capacity = 5;
    config.polling.max_attempts = Some(12);
    config.polling.multiplier = 1.5;
    config.storage.data_dir = Some(dir.path().join("data"));

    // WHEN
    config.save(dir.path()).unwrap();
    let loaded = StudioConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.toml.tmp").exists());
}

#[test]
fn given_partial_file_when_loaded_then_missing_fields_defaulted() {
    // GIVEN: Only one section present
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[polling]\ninterval_secs = 2\nmax_wait_secs = 30\n",
    )
    .unwrap();

    // WHEN
    let config = StudioConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(config.polling.interval_secs, 2);
    assert_eq!(config.polling.max_wait_secs, 30);
    assert_eq!(config.history.capacity, 50);
    let poll = config.polling.to_poll_config();
    assert_eq!(poll.interval, Duration::from_secs(2));
    assert_eq!(poll.max_wait, Duration::from_secs(30));
}

#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[polling\ninterval_secs = ").unwrap();

    let result = StudioConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

/// **VALUE**: Each validation rule rejects its bad value.
///
/// **WHY THIS MATTERS**: A zero interval would make the poll loop spin; a
/// zero capacity would make every append evict itself.
///
/// **BUG THIS CATCHES**: Would catch a removed or inverted validation check.
#[test]
fn given_invalid_values_when_validated_then_rejected() {
    let cases: Vec<(&str, Box<dyn Fn(&mut StudioConfig)>)> = vec![
        ("version", Box::new(|c| c.version = 2)),
        ("scheme", Box::new(|c| c.remote.base_url = "ftp://example.com/".into())),
        ("model", Box::new(|c| c.remote.text_model = " ".into())),
        ("timeout", Box::new(|c| c.remote.request_timeout_secs = 0)),
        ("interval", Box::new(|c| c.polling.interval_secs = 0)),
        ("max_wait", Box::new(|c| c.polling.max_wait_secs = 5)),
        ("attempts", Box::new(|c| c.polling.max_attempts = Some(0))),
        ("multiplier", Box::new(|c| c.polling.multiplier = 0.5)),
        ("max_interval", Box::new(|c| c.polling.max_interval_secs = 1)),
        ("capacity", Box::new(|c| c.history.capacity = 0)),
    ];

    for (name, mutate) in cases {
        // GIVEN: Defaults with one bad value
        let mut config = StudioConfig::default();
        mutate(&mut config);

        // WHEN
        let result = config.validate();

        // THEN
        assert!(
            matches!(result, Err(ConfigError::Validation { .. })),
            "case '{name}' should fail validation"
        );
    }
}

#[test]
fn given_invalid_config_when_saved_then_nothing_written() {
    let dir = TempDir::new().unwrap();
    let mut config = StudioConfig::default();
    config.history.capacity = 0;

    assert!(config.save(dir.path()).is_err());
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn given_storage_override_when_data_dir_then_override_used() {
    let dir = TempDir::new().unwrap();
    let mut config = StudioConfig::default();
    config.storage.data_dir = Some(dir.path().to_path_buf());

    assert_eq!(config.data_dir().unwrap(), dir.path());
    assert_eq!(
        StudioConfig::artifact_dir(dir.path()),
        dir.path().join("artifacts")
    );
}
