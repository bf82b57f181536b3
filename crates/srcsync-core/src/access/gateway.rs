//! Acquiring capabilities from the user.
//!
//! The gateway drives a [`SelectionDialog`] (the picker and the permission
//! prompt) and checks the answer against the backend before minting a
//! capability. It must be driven from a user-initiated interaction; the
//! gateway itself does not check this.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::access::capability::DirectoryCapability;
use crate::access::single::{FileCapability, FileHandle};
use crate::error::{CoreError, CoreResult, ExpectedKind};
use crate::fs::{EntryKind, FileSystem, LocalFs};

/// What the picker should let the user choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFilter {
    Directory,
    File,
}

impl SelectionFilter {
    fn expected(self) -> ExpectedKind {
        match self {
            SelectionFilter::Directory => ExpectedKind::Directory,
            SelectionFilter::File => ExpectedKind::File,
        }
    }
}

/// The user-facing half of capability acquisition.
#[async_trait]
pub trait SelectionDialog: Send + Sync {
    /// Shows a picker. `Ok(None)` means the user dismissed it.
    async fn request_selection(&self, filter: SelectionFilter) -> CoreResult<Option<PathBuf>>;

    /// Asks the user to grant read access to `path`.
    async fn request_read_permission(&self, path: &Path) -> CoreResult<bool>;
}

/// A dialog with a fixed answer, for non-interactive use.
#[derive(Debug, Clone)]
pub struct PresetDialog {
    selection: Option<PathBuf>,
    grant: bool,
}

impl PresetDialog {
    /// Selects `path` and grants read access.
    pub fn granting(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: Some(path.into()),
            grant: true,
        }
    }

    /// Selects `path` and refuses read access.
    pub fn denying(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: Some(path.into()),
            grant: false,
        }
    }

    /// Dismisses the picker.
    pub fn cancelled() -> Self {
        Self {
            selection: None,
            grant: false,
        }
    }
}

#[async_trait]
impl SelectionDialog for PresetDialog {
    async fn request_selection(&self, _filter: SelectionFilter) -> CoreResult<Option<PathBuf>> {
        Ok(self.selection.clone())
    }

    async fn request_read_permission(&self, _path: &Path) -> CoreResult<bool> {
        Ok(self.grant)
    }
}

/// Mints directory and file capabilities after user consent.
pub struct DirectoryAccessGateway<D> {
    dialog: D,
    fs: Arc<dyn FileSystem>,
}

impl<D: SelectionDialog> DirectoryAccessGateway<D> {
    pub fn new(dialog: D, fs: Arc<dyn FileSystem>) -> Self {
        Self { dialog, fs }
    }

    /// A gateway over the local disk.
    pub fn local(dialog: D) -> Self {
        Self::new(dialog, Arc::new(LocalFs))
    }

    /// Prompts for a directory and read permission.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UserCancelled`] — the picker was dismissed.
    /// - [`CoreError::PermissionDenied`] — the user refused, or the OS
    ///   will not list the directory.
    /// - [`CoreError::WrongEntryKind`] — a file was selected.
    /// - [`CoreError::NotFound`] — the selection no longer exists.
    pub async fn request_directory(&self) -> CoreResult<DirectoryCapability> {
        let path = self.select(SelectionFilter::Directory).await?;
        self.grant(&path).await?;

        self.fs.list_entries(&path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                CoreError::PermissionDenied(path.clone())
            } else {
                CoreError::read_failure(&path, e)
            }
        })?;

        tracing::info!(dir = %path.display(), "directory access granted");
        Ok(DirectoryCapability::new(path, Arc::clone(&self.fs)))
    }

    /// Prompts for a single file and read permission.
    ///
    /// Errors mirror [`Self::request_directory`], with
    /// [`CoreError::WrongEntryKind`] raised when a directory is selected.
    pub async fn request_file(&self) -> CoreResult<FileCapability> {
        let path = self.select(SelectionFilter::File).await?;
        self.grant(&path).await?;

        tracing::info!(file = %path.display(), "file access granted");
        Ok(FileCapability::Handle(FileHandle::new(
            path,
            Arc::clone(&self.fs),
        )))
    }

    async fn select(&self, filter: SelectionFilter) -> CoreResult<PathBuf> {
        let path = self
            .dialog
            .request_selection(filter)
            .await?
            .ok_or(CoreError::UserCancelled)?;

        let kind = self.fs.stat(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CoreError::NotFound(path.clone()),
            io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.clone()),
            _ => CoreError::Io(e),
        })?;

        let matches = match filter {
            SelectionFilter::Directory => kind == EntryKind::Directory,
            SelectionFilter::File => kind == EntryKind::File,
        };
        if !matches {
            return Err(CoreError::WrongEntryKind {
                path,
                expected: filter.expected(),
            });
        }
        Ok(path)
    }

    async fn grant(&self, path: &Path) -> CoreResult<()> {
        if self.dialog.request_read_permission(path).await? {
            Ok(())
        } else {
            tracing::warn!(path = %path.display(), "read permission refused");
            Err(CoreError::PermissionDenied(path.to_path_buf()))
        }
    }
}
