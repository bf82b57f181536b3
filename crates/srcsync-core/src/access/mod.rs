//! Capability acquisition and single-file access.
//!
//! [`DirectoryAccessGateway`] turns a user's selection and consent into a
//! [`DirectoryCapability`] or a [`FileCapability`]. The single-file path
//! ([`SingleFileAccessor`]) reads through without caching.

pub mod capability;
pub mod gateway;
pub mod single;

pub use capability::DirectoryCapability;
pub use gateway::{DirectoryAccessGateway, PresetDialog, SelectionDialog, SelectionFilter};
pub use single::{CallbackReader, FileCapability, FileHandle, ReadCallback, SingleFileAccessor};
