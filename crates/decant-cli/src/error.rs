//! Error conversion utilities for CLI.
//!
//! Converts decant-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::Result;
use anyhow::anyhow;
use decant_core::ExtractionError;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathEscape { path } => {
            anyhow!(
                "Security violation: Archive '{}' contains an entry outside the output directory: '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::SymlinkEscape { path } => {
            anyhow!(
                "Symlink rejected in '{}': {} points outside the output directory\n\
                 HINT: Extract without --allow-symlinks to skip symlink entries.",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::NotFound { path } => {
            anyhow!(
                "File not found: {}\n\
                 HINT: Check the path and try again.",
                path.display()
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        ExtractionError::UnsupportedFormat => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, tar.gz, tgz",
                archive.display()
            )
        }
        ExtractionError::BadArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or truncated.",
                archive.display(),
                reason
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}

/// Adds context to a single-file copy error
pub fn add_copy_context<T>(result: Result<T, ExtractionError>, source: &Path) -> anyhow::Result<T> {
    result.map_err(|e| match e {
        ExtractionError::NotFound { path } => anyhow!("Source not found: {}", path.display()),
        other => anyhow::Error::from(other).context(format!("failed to copy '{}'", source.display())),
    })
}
