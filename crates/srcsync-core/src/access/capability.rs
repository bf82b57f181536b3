//! Capability tokens handed out by the access gateway.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fs::FileSystem;

/// A user-approved, read-scoped directory.
///
/// Only [`super::DirectoryAccessGateway`] creates these, after the user
/// has selected the directory and granted read access. Cloning is cheap;
/// clones share the same backend.
#[derive(Clone)]
pub struct DirectoryCapability {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl DirectoryCapability {
    pub(crate) fn new(root: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self { root, fs }
    }

    /// The granted directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The backend the grant was made on.
    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

impl fmt::Debug for DirectoryCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryCapability")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
