//! Everything a command needs, resolved once at startup.

use crate::cli::Cli;
use crate::error::CliError;

use studio_core::Studio;
use studio_core::auth::load_api_key;
use studio_core::classifier::ErrorClassifier;
use studio_core::config::{StudioConfig, default_config_dir};
use studio_core::error::{AuthError, CoreError};
use studio_core::remote::{GeminiClient, RemoteJobClient};

use common::RedactedApiKey;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

const LOG_DIR_NAME: &str = "logs";

/// Config and data locations after applying command-line overrides.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Config dir: `--config-dir` or the platform default. Data dir:
    /// `--data-dir`, then `[storage] data_dir`, then the platform default.
    pub fn resolve(cli: &Cli, config: &StudioConfig) -> Result<Self, CliError> {
        let config_dir = config_dir(cli)?;
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => config.data_dir()?,
        };

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

/// Load `config.toml` from `--config-dir` or the platform default.
pub fn load_config(cli: &Cli) -> Result<StudioConfig, CliError> {
    Ok(StudioConfig::load(&config_dir(cli)?)?)
}

fn config_dir(cli: &Cli) -> Result<PathBuf, CliError> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(default_config_dir()?),
    }
}

pub struct AppState {
    paths: AppPaths,
    config: StudioConfig,
    studio: Studio,
}

impl AppState {
    /// Resolve the API key, build the Gemini client and open storage.
    pub async fn open(config: StudioConfig, paths: AppPaths) -> Result<Self, CliError> {
        let api_key = resolve_api_key(&config.remote.api_key_env)?;
        let client = GeminiClient::from_config(&config.remote, api_key).map_err(CoreError::from)?;
        info!("Using remote API at {}", client.base_url());

        Self::with_client(config, paths, Arc::new(client)).await
    }

    /// Open storage around an already-built client.
    pub async fn with_client(
        config: StudioConfig,
        paths: AppPaths,
        client: Arc<dyn RemoteJobClient>,
    ) -> Result<Self, CliError> {
        let studio = Studio::open(&config, &paths.data_dir, client).await?;

        Ok(Self {
            paths,
            config,
            studio,
        })
    }

    pub fn studio(&self) -> &Studio {
        &self.studio
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.paths.data_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.paths.config_dir
    }
}

/// A missing key is tolerated so `history` works offline; generation then
/// fails with the auth-missing message. A malformed key is rejected up front.
fn resolve_api_key(env_var: &str) -> Result<Option<RedactedApiKey>, CliError> {
    match load_api_key(env_var) {
        Ok(key) => Ok(Some(key)),
        Err(AuthError::Missing { .. }) => {
            warn!("{env_var} is not set; generation requests will fail");
            Ok(None)
        }
        Err(e) => {
            let classified = ErrorClassifier::classify(e);
            Err(CliError::generation(&classified))
        }
    }
}
