/// Persistence for the project registry
///
/// The store hands a full snapshot to a sink after every mutation. Sinks
/// decide where it goes: memory for tests, or a background writer that
/// stores it in a SQLite slot.

pub mod sink;
pub mod snapshot;
pub mod store;

#[cfg(test)]
pub use sink::MemorySink;
pub use sink::SnapshotSink;
pub use snapshot::{from_snapshot, to_snapshot, Snapshot};
pub use store::{ChannelSink, SnapshotStore, WriterHandle};
