//! Listing items and file metadata.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use unicode_normalization::UnicodeNormalization;

/// The kind of a directory entry, with symlinks resolved to their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Sockets, devices, broken symlinks and anything else unreadable as text.
    Other,
}

impl EntryKind {
    /// Classifies `std::fs::Metadata` obtained by following symlinks.
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        Self::from_file_type(metadata.file_type())
    }

    /// Classifies a file type as-is. A symlink's own type is `Other`.
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::Other
        }
    }
}

/// A single item yielded by a directory listing.
///
/// Descriptors are ephemeral: they are produced by one listing and
/// dropped at the end of the scan that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    name: String,
    path: PathBuf,
    kind: EntryKind,
}

impl Descriptor {
    /// Creates a descriptor for `path`. The name is taken from the last
    /// path component and normalised to NFC.
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();
        Self { name, path, kind }
    }

    /// Returns the file or directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns `true` if this entry is (or links to) a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// On-disk metadata of one file, fetched without reading its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub name: String,
    /// Last modification time in milliseconds since the Unix epoch.
    pub modified_ms: i64,
    pub len: u64,
}

/// Converts a [`SystemTime`] to signed milliseconds since the Unix epoch.
pub fn epoch_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}
