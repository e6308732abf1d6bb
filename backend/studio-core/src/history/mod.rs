//! Capped, persisted list of past generations.
//!
//! # Architecture
//!
//! All writes go through a store actor:
//! - commands arrive on an mpsc channel and are handled one at a time
//! - each command persists the new list first, then publishes it to the mirror
//! - callers get the outcome back on a oneshot channel
//!
//! When artifacts are attached, files behind items that leave the list
//! (eviction or clear) are deleted once the shorter list is on disk.
//!
//! Reads come from the `Arc<RwLock<_>>` mirror and never touch the disk.
//! Because the mirror only changes after a successful write, a reader never
//! sees an item that is not also on disk.

use crate::artifact::ArtifactStore;
use crate::error::HistoryError;

use models::HistoryItem;

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc, oneshot};

pub const HISTORY_FILE_NAME: &str = "history.json";
pub const DEFAULT_CAPACITY: usize = 50;

const HISTORY_VERSION: u32 = 1;
const COMMAND_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryDocument {
    version: u32,
    items: Vec<HistoryItem>,
}

enum HistoryCommand {
    Append {
        item: HistoryItem,
        reply: oneshot::Sender<Result<(), HistoryError>>,
    },
    Clear {
        reply: oneshot::Sender<Result<(), HistoryError>>,
    },
}

/// Handle to the history store. Clones share one actor and one mirror.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    command_tx: mpsc::Sender<HistoryCommand>,
    items: Arc<RwLock<Vec<HistoryItem>>>,
    path: PathBuf,
    capacity: usize,
}

impl std::fmt::Debug for HistoryCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryCommand::Append { item, .. } => write!(f, "Append({})", item.id()),
            HistoryCommand::Clear { .. } => f.write_str("Clear"),
        }
    }
}

impl HistoryStore {
    /// Open `{dir}/history.json` and start the store actor.
    ///
    /// A missing file is an empty history. A file that cannot be parsed is an
    /// error; it is left untouched. Must be called inside a tokio runtime.
    pub async fn open(dir: &Path, capacity: usize) -> Result<Self, HistoryError> {
        Self::start(dir, capacity, None).await
    }

    /// Like [`HistoryStore::open`], but items dropped from history also have
    /// their stored artifact released from `artifacts`.
    pub async fn open_with_artifacts(
        dir: &Path,
        capacity: usize,
        artifacts: ArtifactStore,
    ) -> Result<Self, HistoryError> {
        Self::start(dir, capacity, Some(artifacts)).await
    }

    async fn start(
        dir: &Path,
        capacity: usize,
        artifacts: Option<ArtifactStore>,
    ) -> Result<Self, HistoryError> {
        let capacity = capacity.max(1);
        let path = dir.join(HISTORY_FILE_NAME);

        let mut items = load_document(&path).await?;
        if items.len() > capacity {
            debug!(
                "Trimming history from {} to capacity {capacity}",
                items.len()
            );
            items.truncate(capacity);
        }
        info!(
            "History opened at {} ({} items)",
            path.display(),
            items.len()
        );

        let items = Arc::new(RwLock::new(items));
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        tokio::spawn(history_actor(
            command_rx,
            path.clone(),
            Arc::clone(&items),
            capacity,
            artifacts,
        ));

        Ok(Self {
            command_tx,
            items,
            path,
            capacity,
        })
    }

    /// Insert `item` as the newest entry, evicting the oldest beyond capacity.
    pub async fn append(&self, item: HistoryItem) -> Result<(), HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.send(HistoryCommand::Append { item, reply }).await?;
        rx.await.map_err(|_| HistoryError::closed())?
    }

    /// Items, newest first.
    pub async fn list(&self) -> Vec<HistoryItem> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Remove every item, on disk and in memory.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.send(HistoryCommand::Clear { reply }).await?;
        rx.await.map_err(|_| HistoryError::closed())?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn send(&self, command: HistoryCommand) -> Result<(), HistoryError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| HistoryError::closed())
    }
}

/// Processes history commands sequentially.
///
/// Runs until every [`HistoryStore`] handle has been dropped.
async fn history_actor(
    mut command_rx: mpsc::Receiver<HistoryCommand>,
    path: PathBuf,
    items: Arc<RwLock<Vec<HistoryItem>>>,
    capacity: usize,
    artifacts: Option<ArtifactStore>,
) {
    debug!("History actor started for {}", path.display());

    while let Some(command) = command_rx.recv().await {
        match command {
            HistoryCommand::Append { item, reply } => {
                // Only this task writes, so the snapshot cannot go stale.
                let mut next = items.read().await.clone();
                next.retain(|existing| existing.id() != item.id());
                next.insert(0, item);
                let evicted = next.len().saturating_sub(capacity);
                next.truncate(capacity);

                let result = persist_document(&path, &next).await;
                match &result {
                    Ok(()) => {
                        if evicted > 0 {
                            debug!("Evicted {evicted} oldest history item(s)");
                        }
                        let previous =
                            std::mem::replace(&mut *items.write().await, next.clone());
                        release_dropped(artifacts.as_ref(), &previous, &next).await;
                    }
                    Err(e) => warn!("History append failed: {e}"),
                }
                let _ = reply.send(result);
            }
            HistoryCommand::Clear { reply } => {
                let result = persist_document(&path, &[]).await;
                match &result {
                    Ok(()) => {
                        let previous = std::mem::take(&mut *items.write().await);
                        info!("History cleared");
                        release_dropped(artifacts.as_ref(), &previous, &[]).await;
                    }
                    Err(e) => warn!("History clear failed: {e}"),
                }
                let _ = reply.send(result);
            }
        }
    }

    debug!("History actor stopped");
}

/// Release artifacts referenced by `previous` but no longer by `current`.
async fn release_dropped(
    artifacts: Option<&ArtifactStore>,
    previous: &[HistoryItem],
    current: &[HistoryItem],
) {
    let Some(artifacts) = artifacts else {
        return;
    };

    for item in previous {
        let reference = item.artifact_ref();
        if current.iter().any(|kept| kept.artifact_ref() == reference) {
            continue;
        }
        if let Err(e) = artifacts.release_reference(reference).await {
            warn!("Could not release artifact for history item {}: {e}", item.id());
        }
    }
}

async fn load_document(path: &Path) -> Result<Vec<HistoryItem>, HistoryError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            info!("No history at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(HistoryError::read(path, e)),
    };

    let document: HistoryDocument =
        serde_json::from_str(&contents).map_err(|e| HistoryError::parse(path, e.to_string()))?;

    if document.version != HISTORY_VERSION {
        return Err(HistoryError::parse(
            path,
            format!(
                "unsupported history version {} (expected {HISTORY_VERSION})",
                document.version
            ),
        ));
    }

    Ok(document.items)
}

async fn persist_document(path: &Path, items: &[HistoryItem]) -> Result<(), HistoryError> {
    let document = HistoryDocument {
        version: HISTORY_VERSION,
        items: items.to_vec(),
    };
    let json =
        serde_json::to_string_pretty(&document).map_err(|e| HistoryError::serialize(e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| HistoryError::write(parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, json)
        .await
        .map_err(|e| HistoryError::write(&temp_path, e))?;
    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| HistoryError::write(path, e))?;

    Ok(())
}
