//! The incremental file cache and the snapshots it produces.

pub mod incremental;
pub mod snapshot;

pub use incremental::IncrementalFileCache;
pub use snapshot::{CacheEntry, ScanStats, Snapshot, SourceFile};
