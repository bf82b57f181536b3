//! Filesystem primitives the rest of the crate is written against.
//!
//! [`FileSystem`] is the seam between the cache logic and real storage.
//! [`LocalFs`] talks to the operating system through `tokio::fs`; the
//! in-memory [`super::memory::MemoryFs`] implements the same contract for
//! embedding and instrumentation.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::fs::entry::{epoch_millis, Descriptor, EntryKind, FileMetadata};

/// Asynchronous access to a directory tree.
///
/// Implementations must be safe to call concurrently from several futures
/// of the same scan.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Lists the direct children of `dir` in whatever order the backend
    /// yields them. Symlinks are classified by their target.
    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<Descriptor>>;

    /// Fetches metadata for a listed entry without reading its contents.
    async fn metadata(&self, descriptor: &Descriptor) -> io::Result<FileMetadata>;

    /// Reads the full contents of a listed entry.
    async fn read_bytes(&self, descriptor: &Descriptor) -> io::Result<Vec<u8>>;

    /// Classifies the entry at `path`, following symlinks.
    async fn stat(&self, path: &Path) -> io::Result<EntryKind>;
}

/// The local disk, accessed through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl FileSystem for LocalFs {
    async fn list_entries(&self, dir: &Path) -> io::Result<Vec<Descriptor>> {
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();

        while let Some(dir_entry) = read_dir.next_entry().await? {
            let path = dir_entry.path();
            let file_type = dir_entry.file_type().await?;
            let kind = if file_type.is_symlink() {
                resolve_link(&path).await
            } else {
                EntryKind::from_file_type(file_type)
            };
            entries.push(Descriptor::new(path, kind));
        }

        Ok(entries)
    }

    async fn metadata(&self, descriptor: &Descriptor) -> io::Result<FileMetadata> {
        let metadata = tokio::fs::metadata(descriptor.path()).await?;
        Ok(FileMetadata {
            name: descriptor.name().to_string(),
            modified_ms: epoch_millis(metadata.modified()?),
            len: metadata.len(),
        })
    }

    async fn read_bytes(&self, descriptor: &Descriptor) -> io::Result<Vec<u8>> {
        tokio::fs::read(descriptor.path()).await
    }

    async fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(EntryKind::from_metadata(&metadata))
    }
}

/// Classifies a symlink by its target. Dangling links are `Other`.
async fn resolve_link(path: &Path) -> EntryKind {
    match tokio::fs::metadata(path).await {
        Ok(m) => EntryKind::from_metadata(&m),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "cannot follow symlink");
            }
            EntryKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn list_entries_returns_direct_children_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.rs"), "fn a() {}").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("nested.rs"), "").unwrap();

        let entries = LocalFs.list_entries(tmp.path()).await.unwrap();

        assert_eq!(entries.len(), 2);
        let file = entries.iter().find(|e| e.name() == "a.rs").unwrap();
        let dir = entries.iter().find(|e| e.name() == "sub").unwrap();
        assert_eq!(file.kind(), EntryKind::File);
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert!(!entries.iter().any(|e| e.name() == "nested.rs"));
    }

    #[tokio::test]
    async fn list_entries_missing_dir_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFs
            .list_entries(&tmp.path().join("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_classified_by_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real.rs");
        fs::write(&target, "").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("link.rs")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("dangling.rs"))
            .unwrap();

        let entries = LocalFs.list_entries(tmp.path()).await.unwrap();

        let link = entries.iter().find(|e| e.name() == "link.rs").unwrap();
        let dangling = entries.iter().find(|e| e.name() == "dangling.rs").unwrap();
        assert_eq!(link.kind(), EntryKind::File);
        assert_eq!(dangling.kind(), EntryKind::Other);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn link_to_directory_is_a_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias.rs")).unwrap();

        let entries = LocalFs.list_entries(tmp.path()).await.unwrap();

        let alias = entries.iter().find(|e| e.name() == "alias.rs").unwrap();
        assert_eq!(alias.kind(), EntryKind::Directory);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fifo_is_other() {
        let tmp = TempDir::new().unwrap();
        let fifo = tmp.path().join("pipe.rs");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status();
        if !matches!(status, Ok(s) if s.success()) {
            return;
        }

        let entries = LocalFs.list_entries(tmp.path()).await.unwrap();

        let pipe = entries.iter().find(|e| e.name() == "pipe.rs").unwrap();
        assert_eq!(pipe.kind(), EntryKind::Other);
    }

    #[tokio::test]
    async fn metadata_and_read_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("b.rs");
        fs::write(&path, "// empty").unwrap();
        let descriptor = Descriptor::new(path, EntryKind::File);

        let meta = LocalFs.metadata(&descriptor).await.unwrap();
        assert_eq!(meta.name, "b.rs");
        assert_eq!(meta.len, 8);
        assert!(meta.modified_ms > 0);

        let bytes = LocalFs.read_bytes(&descriptor).await.unwrap();
        assert_eq!(bytes, b"// empty");
    }

    #[tokio::test]
    async fn stat_classifies_paths() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("c.rs");
        fs::write(&file, "").unwrap();

        assert_eq!(LocalFs.stat(&file).await.unwrap(), EntryKind::File);
        assert_eq!(LocalFs.stat(tmp.path()).await.unwrap(), EntryKind::Directory);
        assert!(LocalFs.stat(&tmp.path().join("nope")).await.is_err());
    }
}
