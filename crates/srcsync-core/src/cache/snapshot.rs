//! Cache entries and the snapshots handed to callers.

use serde::Serialize;

/// The cached state of one file.
///
/// Entries are immutable: a changed file gets a whole new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    /// Modification time, in epoch milliseconds, observed before the read.
    pub last_modified: i64,
    pub contents: String,
}

impl CacheEntry {
    pub(crate) fn to_source_file(&self) -> SourceFile {
        SourceFile {
            name: self.name.clone(),
            last_modified: self.last_modified,
            contents: self.contents.clone(),
        }
    }
}

/// One file in a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub name: String,
    pub last_modified: i64,
    pub contents: String,
}

/// The result of one scan, in listing order.
///
/// A snapshot owns its data; later scans never change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    files: Vec<SourceFile>,
}

impl Snapshot {
    pub(crate) fn new(files: Vec<SourceFile>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceFile> {
        self.files.iter()
    }

    /// Looks up a file by name.
    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

impl IntoIterator for Snapshot {
    type Item = SourceFile;
    type IntoIter = std::vec::IntoIter<SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Counters for one completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Matching files in the listing.
    pub listed: usize,
    /// Files whose contents were read from disk.
    pub reloaded: usize,
    /// Files served from the cache.
    pub reused: usize,
}
