//! Channel Studio core: turns generation requests into stored assets.
//!
//! - [`orchestrator`]: job lifecycle, polling, cancellation
//! - [`remote`]: the [`remote::RemoteJobClient`] boundary and its Gemini implementation
//! - [`classifier`]: maps failures onto user-facing error kinds
//! - [`history`] / [`artifact`]: what is kept on disk afterwards
//! - [`studio`]: the facade front ends talk to

pub mod artifact;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod remote;
pub mod studio;

pub use studio::Studio;

#[cfg(test)]
mod tests;

pub const APP_DIR_NAME: &str = "channel-studio";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_API_HOST: &str = "generativelanguage.googleapis.com";
pub const GEMINI_API_VERSION: &str = "v1beta";
pub const GEMINI_BASE_URL: &str =
    const_format::concatcp!("https://", GEMINI_API_HOST, "/", GEMINI_API_VERSION, "/");
