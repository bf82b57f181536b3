//! In-memory [`FileSystem`] with call counters and fault injection.
//!
//! `MemoryFs` keeps a flat table of paths. Directories must be added
//! explicitly with [`MemoryFs::add_dir`]; files are listed under their
//! parent path in insertion order. Replacing a file keeps its position.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::fs::backend::FileSystem;
use crate::fs::entry::{Descriptor, EntryKind, FileMetadata};

#[derive(Debug, Clone)]
enum Node {
    File { modified_ms: i64, bytes: Vec<u8> },
    Dir,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<(PathBuf, Node)>,
    failing_listings: HashMap<PathBuf, io::ErrorKind>,
    vanishing: HashSet<PathBuf>,
    failing_metadata: HashSet<PathBuf>,
    failing_reads: HashSet<PathBuf>,
    yields: HashMap<PathBuf, usize>,
    reads_by_path: HashMap<PathBuf, usize>,
}

impl State {
    fn find(&self, path: &Path) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, node)| node)
    }
}

/// An in-memory filesystem for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: Mutex<State>,
    metadata_calls: AtomicUsize,
    read_calls: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test panicked mid-update; the table
        // itself is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a directory.
    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.lock();
        if state.find(&path).is_none() {
            state.entries.push((path, Node::Dir));
        }
    }

    /// Creates or replaces a file with the given timestamp and contents.
    pub fn write_file(&self, path: impl Into<PathBuf>, modified_ms: i64, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        let node = Node::File {
            modified_ms,
            bytes: contents.into(),
        };
        let mut state = self.lock();
        match state.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = node,
            None => state.entries.push((path, node)),
        }
    }

    /// Removes a file or directory entry. Children of a removed directory
    /// are left in place.
    pub fn remove(&self, path: &Path) {
        self.lock().entries.retain(|(p, _)| p != path);
    }

    /// Makes every subsequent listing of `dir` fail with `kind`.
    pub fn fail_listing(&self, dir: impl Into<PathBuf>, kind: io::ErrorKind) {
        self.lock().failing_listings.insert(dir.into(), kind);
    }

    /// Deletes `path` right after the next listing that includes it, so
    /// the caller sees a descriptor for a file that is already gone.
    pub fn vanish_after_listing(&self, path: impl Into<PathBuf>) {
        self.lock().vanishing.insert(path.into());
    }

    /// Makes every subsequent metadata fetch for `path` fail.
    pub fn fail_metadata(&self, path: impl Into<PathBuf>) {
        self.lock().failing_metadata.insert(path.into());
    }

    /// Makes every subsequent content read for `path` fail with
    /// `PermissionDenied`.
    pub fn fail_reads(&self, path: impl Into<PathBuf>) {
        self.lock().failing_reads.insert(path.into());
    }

    /// Delays every operation on `path` by `count` scheduler yields.
    pub fn set_yields(&self, path: impl Into<PathBuf>, count: usize) {
        self.lock().yields.insert(path.into(), count);
    }

    /// Total number of metadata fetches served.
    pub fn metadata_count(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    /// Total number of content reads served.
    pub fn read_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of content reads served for one path.
    pub fn reads_of(&self, path: &Path) -> usize {
        self.lock().reads_by_path.get(path).copied().unwrap_or(0)
    }

    pub fn reset_counts(&self) {
        self.metadata_calls.store(0, Ordering::SeqCst);
        self.read_calls.store(0, Ordering::SeqCst);
        self.lock().reads_by_path.clear();
    }

    async fn delay(&self, path: &Path) {
        let count = self.lock().yields.get(path).copied().unwrap_or(0);
        for _ in 0..count {
            tokio::task::yield_now().await;
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such entry: {}", path.display()),
    )
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<Descriptor>> {
        let mut state = self.lock();
        if let Some(kind) = state.failing_listings.get(dir).copied() {
            return Err(io::Error::new(
                kind,
                format!("listing refused: {}", dir.display()),
            ));
        }
        match state.find(dir) {
            Some(Node::Dir) => {}
            Some(Node::File { .. }) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("not a directory: {}", dir.display()),
                ))
            }
            None => return Err(not_found(dir)),
        }

        let entries: Vec<Descriptor> = state
            .entries
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .map(|(p, node)| {
                let kind = match node {
                    Node::File { .. } => EntryKind::File,
                    Node::Dir => EntryKind::Directory,
                };
                Descriptor::new(p.clone(), kind)
            })
            .collect();

        let State {
            entries: table,
            vanishing,
            ..
        } = &mut *state;
        for d in &entries {
            if vanishing.remove(d.path()) {
                table.retain(|(p, _)| p != d.path());
            }
        }
        Ok(entries)
    }

    async fn metadata(&self, descriptor: &Descriptor) -> io::Result<FileMetadata> {
        self.delay(descriptor.path()).await;
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);

        let state = self.lock();
        if state.failing_metadata.contains(descriptor.path()) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("metadata unavailable: {}", descriptor.path().display()),
            ));
        }
        match state.find(descriptor.path()) {
            Some(Node::File { modified_ms, bytes }) => Ok(FileMetadata {
                name: descriptor.name().to_string(),
                modified_ms: *modified_ms,
                len: bytes.len() as u64,
            }),
            Some(Node::Dir) => Ok(FileMetadata {
                name: descriptor.name().to_string(),
                modified_ms: 0,
                len: 0,
            }),
            None => Err(not_found(descriptor.path())),
        }
    }

    async fn read_bytes(&self, descriptor: &Descriptor) -> io::Result<Vec<u8>> {
        self.delay(descriptor.path()).await;
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.lock();
        *state
            .reads_by_path
            .entry(descriptor.path().to_path_buf())
            .or_insert(0) += 1;
        if state.failing_reads.contains(descriptor.path()) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read revoked: {}", descriptor.path().display()),
            ));
        }
        match state.find(descriptor.path()) {
            Some(Node::File { bytes, .. }) => Ok(bytes.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", descriptor.path().display()),
            )),
            None => Err(not_found(descriptor.path())),
        }
    }

    async fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        match self.lock().find(path) {
            Some(Node::File { .. }) => Ok(EntryKind::File),
            Some(Node::Dir) => Ok(EntryKind::Directory),
            None => Err(not_found(path)),
        }
    }
}
