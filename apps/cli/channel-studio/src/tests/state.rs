use crate::cli::Cli;
use crate::state::{AppPaths, AppState};

use studio_core::config::StudioConfig;
use studio_core::remote::{GeminiClient, RemoteJobClient};

use models::{ErrorKind, GenerationRequest};

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

#[test]
fn given_data_dir_flag_when_resolved_then_flag_wins_over_config() {
    // GIVEN
    let cli = Cli::try_parse_from([
        "channel-studio",
        "--config-dir",
        "/tmp/cfg",
        "--data-dir",
        "/tmp/flag",
        "history",
        "list",
    ])
    .unwrap();
    let mut config = StudioConfig::default();
    config.storage.data_dir = Some(PathBuf::from("/tmp/from-config"));

    // WHEN
    let paths = AppPaths::resolve(&cli, &config).unwrap();

    // THEN
    assert_eq!(paths.config_dir, PathBuf::from("/tmp/cfg"));
    assert_eq!(paths.data_dir, PathBuf::from("/tmp/flag"));
    assert_eq!(paths.log_dir(), PathBuf::from("/tmp/flag/logs"));
}

#[test]
fn given_storage_override_when_resolved_without_flag_then_config_dir_used() {
    let cli = Cli::try_parse_from(["channel-studio", "--config-dir", "/tmp/cfg", "history", "list"])
        .unwrap();
    let mut config = StudioConfig::default();
    config.storage.data_dir = Some(PathBuf::from("/tmp/from-config"));

    let paths = AppPaths::resolve(&cli, &config).unwrap();

    assert_eq!(paths.data_dir, PathBuf::from("/tmp/from-config"));
}

/// **VALUE**: Without an API key, generation fails with the auth-missing
/// message instead of a network error.
///
/// **WHY THIS MATTERS**: The user needs to be told to configure a key.
///
/// **BUG THIS CATCHES**: Would catch a keyless client sending requests and
/// surfacing a 403 as "service unavailable".
#[tokio::test]
async fn given_keyless_client_when_logo_generated_then_auth_missing() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let config = StudioConfig::default();
    let client = GeminiClient::from_config(&config.remote, None).unwrap();
    let paths = AppPaths {
        config_dir: dir.path().join("config"),
        data_dir: dir.path().join("data"),
    };
    let state = AppState::with_client(config, paths, Arc::new(client) as Arc<dyn RemoteJobClient>)
        .await
        .unwrap();

    // WHEN
    let outcome = state
        .studio()
        .submit_request(GenerationRequest::logo("fox"))
        .unwrap()
        .wait()
        .await;

    // THEN
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::AuthMissing);
    assert!(state.studio().get_history().await.is_empty());
    assert_eq!(state.data_dir(), dir.path().join("data"));
}
