//! Read-through access to one user-selected file.
//!
//! A file can arrive in two shapes: a handle the backend resolves to the
//! underlying file on demand ([`FileHandle`]), or an older completion
//! callback API ([`CallbackReader`]). [`FileCapability`] wraps both behind
//! one `fetch_text()` so callers never care which one they hold.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::{CoreError, CoreResult, ExpectedKind};
use crate::fs::{decode_text, Descriptor, EntryKind, FileSystem};

/// Completion callback for a legacy read.
pub type ReadCallback = Box<dyn FnOnce(io::Result<Vec<u8>>) + Send>;

type StartRead = dyn Fn(ReadCallback) + Send + Sync;

/// A file resolved through a [`FileSystem`] backend each time it is read.
#[derive(Clone)]
pub struct FileHandle {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileHandle {
    pub(crate) fn new(path: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self { path, fs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves the handle to the file currently at its path.
    async fn get_file(&self) -> CoreResult<Descriptor> {
        let kind = self
            .fs
            .stat(&self.path)
            .await
            .map_err(|e| CoreError::read_failure(&self.path, e))?;
        if kind != EntryKind::File {
            return Err(CoreError::WrongEntryKind {
                path: self.path.clone(),
                expected: ExpectedKind::File,
            });
        }
        Ok(Descriptor::new(self.path.clone(), kind))
    }

    async fn read(&self) -> CoreResult<Vec<u8>> {
        let descriptor = self.get_file().await?;
        self.fs
            .read_bytes(&descriptor)
            .await
            .map_err(|e| CoreError::read_failure(&self.path, e))
    }
}

/// A file exposed through a start-read function that reports completion
/// through a callback.
#[derive(Clone)]
pub struct CallbackReader {
    path: PathBuf,
    start: Arc<StartRead>,
}

impl CallbackReader {
    /// Wraps a start-read function. `start` must eventually invoke the
    /// callback it receives, at most once.
    pub fn new(path: impl Into<PathBuf>, start: impl Fn(ReadCallback) + Send + Sync + 'static) -> Self {
        Self {
            path: path.into(),
            start: Arc::new(start),
        }
    }

    /// A reader that loads `path` on the blocking thread pool and reports
    /// through the callback. Must be read from within a tokio runtime.
    pub fn blocking(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let target = path.clone();
        Self::new(path, move |done: ReadCallback| {
            let target = target.clone();
            tokio::task::spawn_blocking(move || done(std::fs::read(&target)));
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> CoreResult<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        (self.start)(Box::new(move |result| {
            let _ = tx.send(result);
        }));

        match rx.await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(CoreError::read_failure(&self.path, e)),
            Err(_) => Err(CoreError::read_failure(
                &self.path,
                io::Error::new(io::ErrorKind::Other, "read callback dropped before completion"),
            )),
        }
    }
}

/// Either shape of single-file capability.
#[derive(Clone)]
pub enum FileCapability {
    Handle(FileHandle),
    Callback(CallbackReader),
}

impl FileCapability {
    pub fn path(&self) -> &Path {
        match self {
            FileCapability::Handle(h) => h.path(),
            FileCapability::Callback(c) => c.path(),
        }
    }

    /// Reads and decodes the whole file.
    pub async fn fetch_text(&self) -> CoreResult<String> {
        let bytes = match self {
            FileCapability::Handle(h) => h.read().await?,
            FileCapability::Callback(c) => c.read().await?,
        };
        Ok(decode_text(bytes))
    }
}

impl From<CallbackReader> for FileCapability {
    fn from(reader: CallbackReader) -> Self {
        FileCapability::Callback(reader)
    }
}

impl fmt::Debug for FileCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            FileCapability::Handle(_) => "Handle",
            FileCapability::Callback(_) => "Callback",
        };
        f.debug_struct("FileCapability")
            .field("shape", &shape)
            .field("path", &self.path())
            .finish()
    }
}

/// Reads one file fresh on every call. Nothing is cached.
#[derive(Debug, Clone)]
pub struct SingleFileAccessor {
    capability: FileCapability,
}

impl SingleFileAccessor {
    pub fn new(capability: FileCapability) -> Self {
        Self { capability }
    }

    pub fn path(&self) -> &Path {
        self.capability.path()
    }

    /// Returns the file's current text.
    ///
    /// # Errors
    ///
    /// - [`CoreError::WrongEntryKind`] — the path now names a directory.
    /// - [`CoreError::ReadFailure`] — the file could not be read.
    pub async fn read(&self) -> CoreResult<String> {
        let text = self.capability.fetch_text().await?;
        tracing::debug!(path = %self.path().display(), len = text.len(), "read single file");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use crate::fs::{LocalFs, MemoryFs};

    fn handle(path: &Path) -> FileCapability {
        FileCapability::Handle(FileHandle::new(path.to_path_buf(), Arc::new(LocalFs)))
    }

    #[tokio::test]
    async fn handle_reads_fresh_text_every_call() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ship.rs");
        fs::write(&path, "fn tick() {}").unwrap();
        let accessor = SingleFileAccessor::new(handle(&path));

        assert_eq!(accessor.read().await.unwrap(), "fn tick() {}");

        fs::write(&path, "fn tick() { fire(); }").unwrap();
        assert_eq!(accessor.read().await.unwrap(), "fn tick() { fire(); }");
    }

    #[tokio::test]
    async fn both_shapes_yield_the_same_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ship.rs");
        fs::write(&path, "// 한글 comment").unwrap();

        let modern = SingleFileAccessor::new(handle(&path));
        let legacy = SingleFileAccessor::new(CallbackReader::blocking(&path).into());

        assert_eq!(modern.read().await.unwrap(), legacy.read().await.unwrap());
    }

    #[tokio::test]
    async fn handle_rejects_directory() {
        let tmp = TempDir::new().unwrap();
        let accessor = SingleFileAccessor::new(handle(tmp.path()));

        let err = accessor.read().await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::WrongEntryKind {
                expected: ExpectedKind::File,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn handle_missing_file_is_read_failure() {
        let tmp = TempDir::new().unwrap();
        let accessor = SingleFileAccessor::new(handle(&tmp.path().join("gone.rs")));

        let err = accessor.read().await.unwrap_err();

        assert!(matches!(err, CoreError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn handle_over_memory_backend_does_not_cache() {
        let mem = Arc::new(MemoryFs::new());
        mem.add_dir("/ai");
        mem.write_file("/ai/x.rs", 1, "one");
        let accessor =
            SingleFileAccessor::new(FileCapability::Handle(FileHandle::new("/ai/x.rs".into(), mem.clone())));

        accessor.read().await.unwrap();
        accessor.read().await.unwrap();

        assert_eq!(mem.reads_of(Path::new("/ai/x.rs")), 2);
    }

    #[tokio::test]
    async fn callback_error_is_read_failure() {
        let reader = CallbackReader::new("/ai/x.rs", |done: ReadCallback| {
            done(Err(io::Error::new(io::ErrorKind::PermissionDenied, "revoked")));
        });
        let err = SingleFileAccessor::new(reader.into()).read().await.unwrap_err();

        match err {
            CoreError::ReadFailure { path, source } => {
                assert_eq!(path, PathBuf::from("/ai/x.rs"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_callback_is_read_failure() {
        let reader = CallbackReader::new("/ai/x.rs", |done: ReadCallback| drop(done));
        let err = SingleFileAccessor::new(reader.into()).read().await.unwrap_err();
        assert!(matches!(err, CoreError::ReadFailure { .. }));
    }

    #[tokio::test]
    async fn callback_bytes_are_decoded() {
        let reader = CallbackReader::new("/ai/x.rs", |done: ReadCallback| {
            done(Ok(vec![b'o', b'k', 0xff]));
        });
        let text = SingleFileAccessor::new(reader.into()).read().await.unwrap();
        assert_eq!(text, "ok\u{fffd}");
    }

    #[test]
    fn debug_names_shape() {
        let reader: FileCapability = CallbackReader::new("/ai/x.rs", |_: ReadCallback| {}).into();
        let debug = format!("{reader:?}");
        assert!(debug.contains("Callback"));
        assert!(debug.contains("/ai/x.rs"));
    }
}
