/// Snapshot sinks
///
/// Where snapshots go after a mutation.

use crate::error::Result;
use crate::persistence::snapshot::Snapshot;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Receives a complete snapshot after every registry mutation
///
/// Must not block: the store calls this inline. Errors are logged by the
/// store and otherwise ignored.
pub trait SnapshotSink: Send {
    fn save(&self, snapshot: Snapshot) -> Result<()>;
}

/// Keeps every snapshot in memory
///
/// Cloning shares the same buffer, so a test can hold one handle while the
/// store owns the other.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    writes: Arc<Mutex<Vec<Snapshot>>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent snapshot, if anything was written
    pub fn last(&self) -> Option<Snapshot> {
        self.lock().last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Snapshot>> {
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
impl SnapshotSink for MemorySink {
    fn save(&self, snapshot: Snapshot) -> Result<()> {
        self.lock().push(snapshot);
        Ok(())
    }
}
