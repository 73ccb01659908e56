//! Streaming ZIP and tar.gz extraction with directory reconstruction.
//!
//! `decant-core` materializes a ZIP or gzip-compressed TAR archive under a
//! destination root. Payloads are streamed through a bounded buffer, every
//! missing parent directory is created once, and the sub-directories the
//! archive produced are returned in first-seen order. Entry names that would
//! resolve outside the destination root are rejected.
//!
//! # Examples
//!
//! ```no_run
//! use decant_core::ExtractConfig;
//! use decant_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractConfig::default();
//! let report = extract_archive("archive.tar.gz", "/output/dir", &config)?;
//! println!("Extracted {} files", report.files_extracted);
//! # Ok(())
//! # }
//! ```
//!
//! Single files are copied with [`copy_file`], which recreates symlinks
//! instead of following them and carries permission bits over.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod file_copy;
pub mod formats;
pub mod fs;
pub mod report;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::extract_archive;
pub use api::extract_archive_with_progress;
pub use api::extract_tar_gz;
pub use api::extract_tar_gz_with_progress;
pub use api::extract_zip;
pub use api::extract_zip_with_progress;
pub use api::untar_gz;
pub use api::unzip;
pub use config::ExtractConfig;
pub use error::ErrorKind;
pub use error::ExtractionError;
pub use error::Result;
pub use file_copy::CopyOutcome;
pub use file_copy::copy_file;
pub use fs::FileSystem;
pub use fs::OsFileSystem;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;

// Re-export types module for easier access
pub use types::ArchiveEntry;
pub use types::DestDir;
pub use types::EntryPath;
pub use types::EntryType;
