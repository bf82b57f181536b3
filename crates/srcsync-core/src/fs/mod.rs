//! File system abstractions for srcsync.
//!
//! [`backend::FileSystem`] is the asynchronous primitive layer (listing,
//! metadata, content reads). [`enumerate::list_matching`] builds the
//! suffix-filtered, non-recursive listing the cache consumes.

pub mod backend;
pub mod entry;
pub mod enumerate;
pub mod memory;
pub mod text;

pub use backend::{FileSystem, LocalFs};
pub use entry::{Descriptor, EntryKind, FileMetadata};
pub use enumerate::list_matching;
pub use memory::MemoryFs;
pub use text::decode_text;
