//! One granted directory and its cache.

use crate::access::DirectoryCapability;
use crate::cache::{IncrementalFileCache, ScanStats, Snapshot};
use crate::error::CoreResult;
use crate::event::EventSender;

/// A directory the user granted access to, with the cache that lives as
/// long as the grant does.
///
/// The cache starts empty when the session is created and is only written
/// by [`DirectorySession::scan`].
#[derive(Debug)]
pub struct DirectorySession {
    capability: DirectoryCapability,
    suffix: String,
    cache: IncrementalFileCache,
}

impl DirectorySession {
    pub fn new(capability: DirectoryCapability, suffix: impl Into<String>) -> Self {
        Self {
            capability,
            suffix: suffix.into(),
            cache: IncrementalFileCache::new(),
        }
    }

    /// A session whose scans report on `events`.
    pub fn with_events(
        capability: DirectoryCapability,
        suffix: impl Into<String>,
        events: EventSender,
    ) -> Self {
        Self {
            capability,
            suffix: suffix.into(),
            cache: IncrementalFileCache::with_events(events),
        }
    }

    /// Rescans the directory. See [`IncrementalFileCache::scan`].
    pub async fn scan(&self) -> CoreResult<Snapshot> {
        self.cache.scan(&self.capability, &self.suffix).await
    }

    pub async fn scan_with_stats(&self) -> CoreResult<(Snapshot, ScanStats)> {
        self.cache
            .scan_with_stats(&self.capability, &self.suffix)
            .await
    }

    pub fn capability(&self) -> &DirectoryCapability {
        &self.capability
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn cache(&self) -> &IncrementalFileCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use crate::access::{DirectoryAccessGateway, PresetDialog};
    use crate::error::CoreError;
    use crate::event::Event;
    use crate::fs::MemoryFs;

    async fn session(mem: Arc<MemoryFs>) -> DirectorySession {
        let gateway = DirectoryAccessGateway::new(PresetDialog::granting("/ai"), mem);
        let cap = gateway.request_directory().await.unwrap();
        DirectorySession::new(cap, ".rs")
    }

    #[tokio::test]
    async fn new_session_has_empty_cache() {
        let mem = Arc::new(MemoryFs::new());
        mem.add_dir("/ai");
        let session = session(mem).await;

        assert!(session.cache().is_empty());
        assert_eq!(session.suffix(), ".rs");
        assert_eq!(session.capability().root(), Path::new("/ai"));
    }

    #[tokio::test]
    async fn rescans_reuse_the_session_cache() {
        let mem = Arc::new(MemoryFs::new());
        mem.add_dir("/ai");
        mem.write_file("/ai/a.rs", 1, "fn main(){}");
        let session = session(mem.clone()).await;

        session.scan().await.unwrap();
        let (snapshot, stats) = session.scan_with_stats().await.unwrap();

        assert_eq!(snapshot.get("a.rs").unwrap().contents, "fn main(){}");
        assert_eq!(stats.reused, 1);
        assert_eq!(mem.read_count(), 1);
    }

    #[tokio::test]
    async fn separate_sessions_do_not_share_entries() {
        let mem = Arc::new(MemoryFs::new());
        mem.add_dir("/ai");
        mem.write_file("/ai/a.rs", 1, "a");
        let first = session(mem.clone()).await;
        let second = session(mem.clone()).await;

        first.scan().await.unwrap();
        second.scan().await.unwrap();

        assert_eq!(mem.read_count(), 2);
    }

    #[tokio::test]
    async fn session_events_reach_receiver() {
        let mem = Arc::new(MemoryFs::new());
        mem.add_dir("/ai");
        let gateway = DirectoryAccessGateway::new(PresetDialog::granting("/ai"), mem);
        let cap = gateway.request_directory().await.unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let session = DirectorySession::with_events(cap, ".rs", tx);

        let err = session.scan().await.unwrap_err();

        assert!(matches!(err, CoreError::NoMatchingFiles { .. }));
        assert!(matches!(rx.try_recv().unwrap(), Event::NoMatchingFiles { .. }));
    }
}
