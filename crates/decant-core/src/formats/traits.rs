//! Common traits for archive format handlers.

use crate::Result;
use crate::extraction::DirectoryRecording;
use crate::extraction::ExtractionEngine;

/// Trait for archive format handlers.
///
/// A handler owns an opened container and feeds every entry, in container
/// order, to the engine.
pub trait ArchiveFormat {
    /// Walks the container and processes each entry through `engine`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the container reader or the engine.
    /// Entries processed before the error stay on disk.
    fn extract(&mut self, engine: &mut ExtractionEngine<'_>) -> Result<()>;

    /// Returns the archive format name.
    fn format_name(&self) -> &'static str;

    /// Returns how directory records in this format are reported.
    fn directory_recording(&self) -> DirectoryRecording;
}
