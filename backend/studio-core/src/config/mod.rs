use crate::error::config::ConfigError;
use crate::orchestrator::PollConfig;
use crate::remote::gemini::{
    DEFAULT_IMAGE_EDIT_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, DEFAULT_VIDEO_MODEL,
};
use crate::{APP_DIR_NAME, DEFAULT_API_KEY_ENV, GEMINI_BASE_URL};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_VERSION: u32 = 1;
const ARTIFACT_DIR_NAME: &str = "artifacts";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_edit_model")]
    pub image_edit_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_video_model")]
    pub video_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            image_model: default_image_model(),
            image_edit_model: default_image_edit_model(),
            text_model: default_text_model(),
            video_model: default_video_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Poll schedule for long-running jobs, in whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
            max_attempts: None,
            multiplier: default_multiplier(),
            max_interval_secs: default_max_interval_secs(),
        }
    }
}

impl PollingConfig {
    pub fn to_poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_wait: Duration::from_secs(self.max_wait_secs),
            max_attempts: self.max_attempts,
            multiplier: self.multiplier,
            max_interval: Duration::from_secs(self.max_interval_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            remote: RemoteConfig::default(),
            polling: PollingConfig::default(),
            history: HistoryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    GEMINI_BASE_URL.to_string()
}
fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}
fn default_image_edit_model() -> String {
    DEFAULT_IMAGE_EDIT_MODEL.to_string()
}
fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}
fn default_video_model() -> String {
    DEFAULT_VIDEO_MODEL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_interval_secs() -> u64 {
    10
}
fn default_max_wait_secs() -> u64 {
    600
}
fn default_multiplier() -> f64 {
    1.0
}
fn default_max_interval_secs() -> u64 {
    60
}
fn default_capacity() -> usize {
    50
}

// ============================================
// DIRECTORIES
// ============================================

/// `<platform config dir>/channel-studio`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::no_platform_dir("config"))
}

/// `<platform data dir>/channel-studio`.
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| ConfigError::no_platform_dir("data"))
}

// ============================================
// IMPLEMENTATION
// ============================================

impl StudioConfig {
    /// Load config from `{config_dir}/config.toml`.
    ///
    /// A missing file yields defaults. A file that exists but cannot be read,
    /// parsed or validated is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::Read {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: StudioConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {e}");
            ConfigError::Parse {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to `{config_dir}/config.toml` (temp file + rename).
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{CONFIG_VERSION})",
                self.version
            )));
        }

        let remote = &self.remote;
        if !remote.base_url.starts_with("http://") && !remote.base_url.starts_with("https://") {
            return Err(ConfigError::validation(format!(
                "Invalid base_url: {} (must be http or https)",
                remote.base_url
            )));
        }

        if remote.api_key_env.trim().is_empty() {
            return Err(ConfigError::validation("api_key_env cannot be empty"));
        }

        for (field, model) in [
            ("image_model", &remote.image_model),
            ("image_edit_model", &remote.image_edit_model),
            ("text_model", &remote.text_model),
            ("video_model", &remote.video_model),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::validation(format!("{field} cannot be empty")));
            }
        }

        if remote.request_timeout_secs == 0 {
            return Err(ConfigError::validation("request_timeout_secs must be > 0"));
        }

        let polling = &self.polling;
        if polling.interval_secs == 0 {
            return Err(ConfigError::validation("polling.interval_secs must be > 0"));
        }

        if polling.max_wait_secs < polling.interval_secs {
            return Err(ConfigError::validation(format!(
                "polling.max_wait_secs ({}) must be >= interval_secs ({})",
                polling.max_wait_secs, polling.interval_secs
            )));
        }

        if polling.max_attempts == Some(0) {
            return Err(ConfigError::validation("polling.max_attempts must be > 0"));
        }

        if !polling.multiplier.is_finite() || polling.multiplier < 1.0 {
            return Err(ConfigError::validation(format!(
                "polling.multiplier must be >= 1.0, got {}",
                polling.multiplier
            )));
        }

        if polling.max_interval_secs < polling.interval_secs {
            return Err(ConfigError::validation(format!(
                "polling.max_interval_secs ({}) must be >= interval_secs ({})",
                polling.max_interval_secs, polling.interval_secs
            )));
        }

        if self.history.capacity == 0 {
            return Err(ConfigError::validation("history.capacity must be >= 1"));
        }

        Ok(())
    }

    /// Data directory: the `[storage]` override or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    pub fn artifact_dir(data_dir: &Path) -> PathBuf {
        data_dir.join(ARTIFACT_DIR_NAME)
    }
}
