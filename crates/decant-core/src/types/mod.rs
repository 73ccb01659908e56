//! Validated types shared by the format readers and the extraction engine.
//!
//! Paths taken from an archive never reach the filesystem directly: they are
//! first reduced to an [`EntryPath`] and then joined onto a [`DestDir`].

pub mod dest_dir;
pub mod entry;
pub mod entry_path;

pub use dest_dir::DestDir;
pub use entry::ArchiveEntry;
pub use entry::EntryType;
pub use entry_path::EntryPath;
