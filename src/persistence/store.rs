/// SQLite-backed snapshot slot
///
/// Loading happens once at startup. Writes go through a background task fed
/// by an unbounded channel: the registry enqueues and moves on, the task
/// writes snapshots one after another in the order they were produced.

use crate::db::Database;
use crate::error::{RegistryError, Result};
use crate::persistence::sink::SnapshotSink;
use crate::persistence::snapshot::Snapshot;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One named slot in the database holding the registry snapshot
#[derive(Clone)]
pub struct SnapshotStore {
    db: Database,
    key: String,
}

impl SnapshotStore {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored snapshot
    ///
    /// # Returns
    /// * `Ok(Some(Snapshot))` - A snapshot was stored
    /// * `Ok(None)` - Nothing stored yet, or the stored document is unreadable
    /// * `Err(RegistryError)` - The database itself failed
    ///
    /// An unreadable document is copied to the `<key>.corrupt` slot before
    /// `None` is returned, so the next save cannot destroy the only copy.
    pub async fn load(&self) -> Result<Option<Snapshot>> {
        let Some(item) = self.db.get_item(&self.key).await? else {
            info!(key = %self.key, "no stored snapshot");
            return Ok(None);
        };

        match Snapshot::from_json(&item.value) {
            Ok(snapshot) => {
                info!(
                    key = %self.key,
                    projects = snapshot.projects.len(),
                    "loaded snapshot"
                );
                Ok(Some(snapshot))
            }
            Err(e) => {
                let backup = self.corrupt_key();
                self.db.set_item(&backup, &item.value).await?;
                warn!(
                    key = %self.key,
                    %backup,
                    error = %e,
                    "stored snapshot is corrupt, moved it aside"
                );
                Ok(None)
            }
        }
    }

    /// Write a snapshot, replacing the previous one
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        self.db.set_item(&self.key, &json).await
    }

    /// Delete the stored snapshot
    ///
    /// The next start uses the default project list again.
    pub async fn clear(&self) -> Result<bool> {
        self.db.remove_item(&self.key).await
    }

    /// Slot holding the last unreadable document
    fn corrupt_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Start the background writer
    ///
    /// Must be called inside a tokio runtime. The returned sink goes to the
    /// registry; keep the handle and call `shutdown` once the registry is
    /// dropped so queued writes are not lost at exit.
    pub fn spawn_writer(&self) -> (ChannelSink, WriterHandle) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Snapshot>();
        let store = self.clone();

        let task = tokio::spawn(async move {
            let mut written = 0usize;
            while let Some(snapshot) = receiver.recv().await {
                match store.save(&snapshot).await {
                    Ok(()) => written += 1,
                    Err(e) => warn!(key = %store.key, error = %e, "failed to persist snapshot"),
                }
            }
            debug!(key = %store.key, written, "snapshot writer stopped");
        });

        (ChannelSink { sender }, WriterHandle { task })
    }
}

/// Sink that queues snapshots for the background writer
#[derive(Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Snapshot>,
}

impl SnapshotSink for ChannelSink {
    fn save(&self, snapshot: Snapshot) -> Result<()> {
        self.sender
            .send(snapshot)
            .map_err(|_| RegistryError::Persistence("snapshot writer has stopped".to_string()))
    }
}

/// Owns the background writer task
pub struct WriterHandle {
    task: JoinHandle<()>,
}

impl WriterHandle {
    /// Wait for every queued snapshot to be written
    ///
    /// Returns once all `ChannelSink`s are dropped and the queue is empty.
    pub async fn shutdown(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| RegistryError::Persistence(format!("snapshot writer crashed: {}", e)))
    }
}
