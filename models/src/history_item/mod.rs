pub mod builder;

use crate::asset::AssetKind;
use crate::error::model_error::ModelError;
use crate::history_item::builder::HistoryItemBuilder;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated artifact kept in history.
///
/// Created once on job success and never modified; construct through
/// [`builder::HistoryItemBuilder`]. Deserialization goes through the same
/// builder, so a hand-edited file cannot smuggle in blank fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "HistoryItemRecord")]
pub struct HistoryItem {
    id: String,
    #[serde(rename = "type")]
    kind: AssetKind,
    artifact_ref: String,
    prompt: String,
    created_at: DateTime<Utc>,
}

impl HistoryItem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Local reference (file path) of the stored artifact.
    pub fn artifact_ref(&self) -> &str {
        &self.artifact_ref
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `generated-<kind>-<id>.<ext>`, the name offered when downloading.
    pub fn download_file_name(&self) -> String {
        let extension = Path::new(&self.artifact_ref)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_else(|| self.kind.default_extension());

        format!("generated-{}-{}.{}", self.kind.slug(), self.id, extension)
    }
}

/// Unvalidated on-disk shape of a [`HistoryItem`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryItemRecord {
    id: String,
    #[serde(rename = "type")]
    kind: AssetKind,
    artifact_ref: String,
    prompt: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<HistoryItemRecord> for HistoryItem {
    type Error = ModelError;

    fn try_from(record: HistoryItemRecord) -> Result<Self, Self::Error> {
        HistoryItemBuilder::default()
            .with_id(record.id)
            .with_kind(record.kind)
            .with_artifact_ref(record.artifact_ref)
            .with_prompt(record.prompt)
            .with_created_at(record.created_at)
            .build()
    }
}
