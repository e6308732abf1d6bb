//! Domain models for Channel Studio.
//!
//! Pure data passed between layers: what the caller asks for
//! ([`GenerationRequest`]), how a job is progressing ([`JobStatus`],
//! [`JobPhase`]), what is kept afterwards ([`HistoryItem`]) and what the user
//! sees when it goes wrong ([`ClassifiedError`]).
//!
//! - **models** (this crate): data and its validation rules
//! - **studio-core**: orchestration, remote client, persistence
//! - **channel-studio**: the command-line front end

pub mod asset;
pub mod classified;
pub mod error;
pub mod history_item;
pub mod job;
pub mod request;

pub use asset::{
    AspectRatio, AssetKind, AssetSize, BANNER_SIZE, LOGO_SIZE, OutputKind, THUMBNAIL_SIZE,
    VideoResolution,
};
pub use classified::{ClassifiedError, ErrorKind};
pub use error::model_error::ModelError;
pub use history_item::HistoryItem;
pub use history_item::builder::HistoryItemBuilder;
pub use job::{JobId, JobPhase, JobStatus, OperationRef, RemoteArtifactRef};
pub use request::{GenerationPayload, GenerationRequest, ReferenceImage};

#[cfg(test)]
mod tests;
