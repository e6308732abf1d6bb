//! Local storage for generated output.

use crate::error::ArtifactError;
use crate::remote::Artifact;

use models::{AssetKind, JobId};

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

/// A stored artifact on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    path: PathBuf,
    mime_type: String,
    len: usize,
}

impl StoredArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reference recorded in history.
    pub fn reference(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `generated-<kind>-<job_id>.<ext>` under the store root.
    pub fn path_for(&self, job_id: JobId, kind: AssetKind, mime_type: &str) -> PathBuf {
        let extension = extension_for(mime_type, kind);
        self.root
            .join(format!("generated-{}-{job_id}.{extension}", kind.slug()))
    }

    /// Write `artifact` to disk (temp file + rename).
    pub async fn store(
        &self,
        job_id: JobId,
        kind: AssetKind,
        artifact: &Artifact,
    ) -> Result<StoredArtifact, ArtifactError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ArtifactError::write(&self.root, e))?;

        let path = self.path_for(job_id, kind, artifact.mime_type());
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        tokio::fs::write(&temp_path, artifact.bytes())
            .await
            .map_err(|e| ArtifactError::write(&temp_path, e))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| ArtifactError::write(&path, e))?;

        info!(
            "Stored {kind} artifact ({} bytes) at {}",
            artifact.bytes().len(),
            path.display()
        );

        Ok(StoredArtifact {
            path,
            mime_type: artifact.mime_type().to_string(),
            len: artifact.bytes().len(),
        })
    }

    /// Delete a stored artifact. Already-missing files are fine.
    pub async fn release(&self, stored: &StoredArtifact) -> Result<(), ArtifactError> {
        remove_artifact(&stored.path).await
    }

    /// Delete the file behind a history `artifact_ref`.
    ///
    /// Only files directly under the store root are removed; any other
    /// reference is left alone and `Ok(false)` is returned.
    pub async fn release_reference(&self, reference: &str) -> Result<bool, ArtifactError> {
        let path = Path::new(reference);
        if path.parent() != Some(self.root.as_path()) {
            debug!("Not releasing {reference}: outside {}", self.root.display());
            return Ok(false);
        }

        remove_artifact(path).await?;
        Ok(true)
    }
}

async fn remove_artifact(path: &Path) -> Result<(), ArtifactError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("Released artifact {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
        Err(e) => Err(ArtifactError::remove(path, e)),
    }
}

/// File extension for a mime type, falling back to the kind's default.
pub fn extension_for(mime_type: &str, kind: AssetKind) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "text/plain" => "txt",
        _ => kind.default_extension(),
    }
}
