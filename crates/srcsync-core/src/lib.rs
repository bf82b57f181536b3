//! srcsync core library: UI-agnostic access to user-granted source files.
//!
//! `srcsync-core` lets a tool read source files from a directory the user
//! granted access to, and keeps an in-memory copy in sync with the disk
//! across repeated scans without re-reading unchanged files.
//!
//! # Modules
//!
//! - [`access`] — Capability acquisition ([`DirectoryAccessGateway`]) and single-file reads.
//! - [`fs`] — Filesystem primitives ([`FileSystem`], [`LocalFs`], [`MemoryFs`]) and suffix listing.
//! - [`cache`] — The incremental cache ([`IncrementalFileCache`]) and [`Snapshot`]s.
//! - [`session`] — [`DirectorySession`], one grant plus its cache.
//! - [`config`] — User-facing configuration (TOML-based settings).
//! - [`event`] — Notices sent from the core to the frontend.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod access;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod session;

pub use access::{
    CallbackReader, DirectoryAccessGateway, DirectoryCapability, FileCapability,
    PresetDialog, ReadCallback, SelectionDialog, SelectionFilter, SingleFileAccessor,
};
pub use cache::{CacheEntry, IncrementalFileCache, ScanStats, Snapshot, SourceFile};
pub use config::settings::Config;
pub use error::{CoreError, CoreResult, ExpectedKind};
pub use event::{Event, EventSender};
pub use fs::{list_matching, Descriptor, EntryKind, FileSystem, LocalFs, MemoryFs};
pub use session::DirectorySession;
