//! Incremental reloading of a directory's source files.

use std::collections::HashSet;
use std::path::Path;

use dashmap::DashMap;
use futures::future::try_join_all;

use crate::access::DirectoryCapability;
use crate::cache::snapshot::{CacheEntry, ScanStats, Snapshot, SourceFile};
use crate::error::{CoreError, CoreResult};
use crate::event::{emit, Event, EventSender};
use crate::fs::{decode_text, list_matching, Descriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Freshness {
    Reused,
    Reloaded,
}

/// Per-directory cache of file contents keyed by file name.
///
/// A scan re-reads a file only when its modification time differs from
/// the cached one. Entries for files that disappeared stay in the map but
/// never reach a snapshot, since snapshots are built from the fresh
/// listing.
#[derive(Debug, Default)]
pub struct IncrementalFileCache {
    entries: DashMap<String, CacheEntry>,
    events: Option<EventSender>,
}

impl IncrementalFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that reports notices and scan results on `events`.
    pub fn with_events(events: EventSender) -> Self {
        Self {
            entries: DashMap::new(),
            events: Some(events),
        }
    }

    /// Scans `capability` for files ending in `suffix` and returns their
    /// current contents.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoMatchingFiles`] — nothing matched; an
    ///   [`Event::NoMatchingFiles`] notice is emitted as well.
    /// - [`CoreError::ReadFailure`] — a listing, metadata or content fetch
    ///   failed. Entries written before the failure are kept.
    /// - [`CoreError::PermissionDenied`] — the directory can no longer be listed.
    pub async fn scan(&self, capability: &DirectoryCapability, suffix: &str) -> CoreResult<Snapshot> {
        self.scan_with_stats(capability, suffix)
            .await
            .map(|(snapshot, _)| snapshot)
    }

    /// Same as [`Self::scan`], also returning how many files were reloaded.
    pub async fn scan_with_stats(
        &self,
        capability: &DirectoryCapability,
        suffix: &str,
    ) -> CoreResult<(Snapshot, ScanStats)> {
        let dir = capability.root();
        let listed = list_matching(capability, suffix)
            .await
            .map_err(|e| self.aborted(dir, e))?;
        let descriptors = unique_by_name(listed);

        if descriptors.is_empty() {
            tracing::warn!(dir = %dir.display(), suffix, "no matching files");
            emit(
                self.events.as_ref(),
                Event::NoMatchingFiles {
                    dir: dir.to_path_buf(),
                    suffix: suffix.to_string(),
                },
            );
            return Err(CoreError::NoMatchingFiles {
                dir: dir.to_path_buf(),
                suffix: suffix.to_string(),
            });
        }

        // Each future owns one key, so completion order cannot change the
        // final map. try_join_all keeps listing order in its output.
        let refreshed = try_join_all(descriptors.iter().map(|d| self.refresh(capability, d))).await;
        let refreshed = refreshed.map_err(|e| self.aborted(dir, e))?;

        let mut stats = ScanStats {
            listed: refreshed.len(),
            ..ScanStats::default()
        };
        let files: Vec<SourceFile> = refreshed
            .into_iter()
            .map(|(file, freshness)| {
                match freshness {
                    Freshness::Reused => stats.reused += 1,
                    Freshness::Reloaded => stats.reloaded += 1,
                }
                file
            })
            .collect();

        tracing::info!(
            dir = %dir.display(),
            files = stats.listed,
            reloaded = stats.reloaded,
            reused = stats.reused,
            "scan complete"
        );
        emit(
            self.events.as_ref(),
            Event::ScanComplete {
                dir: dir.to_path_buf(),
                files: stats.listed,
                reloaded: stats.reloaded,
                reused: stats.reused,
            },
        );

        Ok((Snapshot::new(files), stats))
    }

    fn aborted(&self, dir: &Path, e: CoreError) -> CoreError {
        tracing::warn!(dir = %dir.display(), error = %e, "scan aborted");
        emit(
            self.events.as_ref(),
            Event::ScanFailed {
                dir: dir.to_path_buf(),
                error: e.to_string(),
            },
        );
        e
    }

    async fn refresh(
        &self,
        capability: &DirectoryCapability,
        descriptor: &Descriptor,
    ) -> CoreResult<(SourceFile, Freshness)> {
        let fs = capability.fs();
        let metadata = fs
            .metadata(descriptor)
            .await
            .map_err(|e| CoreError::read_failure(descriptor.path(), e))?;

        let cached = self
            .entries
            .get(descriptor.name())
            .filter(|entry| entry.last_modified == metadata.modified_ms)
            .map(|entry| entry.to_source_file());
        if let Some(file) = cached {
            return Ok((file, Freshness::Reused));
        }

        let bytes = fs
            .read_bytes(descriptor)
            .await
            .map_err(|e| CoreError::read_failure(descriptor.path(), e))?;
        let entry = CacheEntry {
            name: descriptor.name().to_string(),
            last_modified: metadata.modified_ms,
            contents: decode_text(bytes),
        };
        tracing::debug!(file = descriptor.name(), modified = entry.last_modified, "reloaded");

        let file = entry.to_source_file();
        self.entries.insert(entry.name.clone(), entry);
        Ok((file, Freshness::Reloaded))
    }

    /// Returns a copy of the cached entry for `name`.
    pub fn get(&self, name: &str) -> Option<CacheEntry> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    /// Number of cached entries, including ones for files that have since
    /// disappeared.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every entry; the next scan reloads everything.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Keeps the first descriptor for each name. Two raw names can normalise
/// to the same NFC name.
fn unique_by_name(descriptors: Vec<Descriptor>) -> Vec<Descriptor> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    descriptors
        .into_iter()
        .filter(|d| {
            let first = seen.insert(d.name().to_string());
            if !first {
                tracing::debug!(file = d.name(), "duplicate name after normalisation, skipped");
            }
            first
        })
        .collect()
}
