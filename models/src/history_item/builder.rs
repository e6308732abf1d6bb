use crate::asset::AssetKind;
use crate::error::model_error::ModelError;
use crate::history_item::HistoryItem;

use chrono::{DateTime, Utc};

/// Builder for validated [`HistoryItem`] instances.
#[derive(Debug, Default)]
pub struct HistoryItemBuilder {
    id: Option<String>,
    kind: Option<AssetKind>,
    artifact_ref: Option<String>,
    prompt: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl HistoryItemBuilder {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_kind(mut self, kind: AssetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_artifact_ref(mut self, artifact_ref: impl Into<String>) -> Self {
        self.artifact_ref = Some(artifact_ref.into());
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the item, rejecting missing or blank fields.
    #[track_caller]
    pub fn build(self) -> Result<HistoryItem, ModelError> {
        let id = required_text(self.id, "History id")?;

        let kind = self
            .kind
            .ok_or_else(|| ModelError::validation("Asset kind is required"))?;

        let artifact_ref = required_text(self.artifact_ref, "Artifact reference")?;
        let prompt = required_text(self.prompt, "Prompt")?;

        let created_at = self
            .created_at
            .ok_or_else(|| ModelError::validation("Creation time is required"))?;

        Ok(HistoryItem {
            id,
            kind,
            artifact_ref,
            prompt,
            created_at,
        })
    }
}

#[track_caller]
fn required_text(value: Option<String>, field: &str) -> Result<String, ModelError> {
    match value {
        None => Err(ModelError::validation(format!("{field} is required"))),
        Some(text) if text.trim().is_empty() => {
            Err(ModelError::validation(format!("{field} cannot be empty")))
        }
        Some(text) => Ok(text),
    }
}
