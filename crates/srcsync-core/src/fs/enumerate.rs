//! Suffix-filtered directory listing.

use std::path::Path;

use crate::access::DirectoryCapability;
use crate::error::{CoreError, CoreResult};
use crate::fs::entry::Descriptor;

/// Lists the direct children of `capability` whose name ends with `suffix`.
///
/// Subdirectories, special files and non-matching names are skipped
/// silently. The returned descriptors are in the order the backend listed
/// them, which is **not** sorted and not stable across calls.
///
/// # Errors
///
/// - [`CoreError::PermissionDenied`] — the directory can no longer be listed.
/// - [`CoreError::ReadFailure`] — any other listing failure.
pub async fn list_matching(
    capability: &DirectoryCapability,
    suffix: &str,
) -> CoreResult<Vec<Descriptor>> {
    let root = capability.root();
    let entries = capability
        .fs()
        .list_entries(root)
        .await
        .map_err(|e| listing_error(root, e))?;

    let total = entries.len();
    let matching: Vec<Descriptor> = entries
        .into_iter()
        .filter(|d| d.is_file() && d.name().ends_with(suffix))
        .collect();

    tracing::debug!(
        dir = %root.display(),
        suffix,
        total,
        matching = matching.len(),
        "listed directory"
    );
    Ok(matching)
}

fn listing_error(root: &Path, e: std::io::Error) -> CoreError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        CoreError::PermissionDenied(root.to_path_buf())
    } else {
        CoreError::read_failure(root, e)
    }
}
