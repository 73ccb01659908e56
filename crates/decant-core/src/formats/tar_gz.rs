//! Gzip-compressed TAR format handler.

use std::io;
use std::io::Read;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use log::debug;
use log::trace;

use crate::ExtractionError;
use crate::Result;
use crate::extraction::DirectoryRecording;
use crate::extraction::ExtractionEngine;
use crate::types::ArchiveEntry;
use crate::types::EntryType;

use super::traits::ArchiveFormat;

/// TAR.GZ archive handler.
///
/// The container is read as a single forward stream: gzip decompression
/// feeds the tar reader, and each entry's payload must be consumed before
/// the next header is read.
pub struct TarGzArchive<R: Read> {
    inner: tar::Archive<GzDecoder<R>>,
}

impl<R: Read> TarGzArchive<R> {
    /// Wraps a gzip-compressed TAR stream. Nothing is read until
    /// extraction starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::formats::TarGzArchive;
    /// use decant_core::formats::ArchiveFormat;
    /// use std::io::Cursor;
    ///
    /// let archive = TarGzArchive::new(Cursor::new(Vec::new()));
    /// assert_eq!(archive.format_name(), "tar.gz");
    /// ```
    pub fn new(source: R) -> Self {
        Self {
            inner: tar::Archive::new(GzDecoder::new(source)),
        }
    }
}

impl<R: Read> ArchiveFormat for TarGzArchive<R> {
    fn extract(&mut self, engine: &mut ExtractionEngine<'_>) -> Result<()> {
        let entries = self.inner.entries().map_err(structural_error)?;

        let mut count = 0usize;
        for entry in entries {
            let mut entry = entry.map_err(structural_error)?;
            let Some(record) = TarEntryAdapter::to_entry(&entry)? else {
                continue;
            };
            engine.process(&record, &mut entry)?;
            count += 1;
        }

        debug!("TAR.GZ archive with {count} entries");
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "tar.gz"
    }

    fn directory_recording(&self) -> DirectoryRecording {
        DirectoryRecording::ImpliedOnly
    }
}

/// Failures while reading the gzip or tar framing are container defects,
/// unless the underlying source itself failed.
fn structural_error(err: io::Error) -> ExtractionError {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::Interrupted => ExtractionError::Io(err),
        _ => ExtractionError::BadArchive(format!("corrupt TAR.GZ stream: {err}")),
    }
}

/// Maps a `tar` crate entry onto [`ArchiveEntry`].
struct TarEntryAdapter;

impl TarEntryAdapter {
    /// Returns `None` for metadata-only records the tar reader surfaces but
    /// which describe no entry of their own.
    fn to_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Option<ArchiveEntry>> {
        let name = Self::entry_name(&entry.path_bytes())?;
        let kind = entry.header().entry_type();

        let entry_type = match kind {
            tar::EntryType::Directory => EntryType::Directory,
            tar::EntryType::Regular | tar::EntryType::Continuous => EntryType::File,
            tar::EntryType::Symlink => EntryType::Symlink {
                target: Self::link_target(entry, &name)?,
            },
            tar::EntryType::Link => EntryType::Hardlink {
                target: Self::link_target(entry, &name)?,
            },
            tar::EntryType::XGlobalHeader => {
                trace!("ignoring pax global header");
                return Ok(None);
            }
            other => EntryType::Other {
                description: format!("{other:?}"),
            },
        };

        let size = if entry_type.has_payload() { entry.size() } else { 0 };
        Ok(Some(ArchiveEntry::new(name, entry_type, size)))
    }

    /// Entry names must be UTF-8. Lossy decoding would map distinct names
    /// onto the same replacement string.
    fn entry_name(raw: &[u8]) -> Result<String> {
        std::str::from_utf8(raw).map(str::to_owned).map_err(|_| {
            ExtractionError::BadArchive(format!(
                "entry name is not valid UTF-8: {}",
                raw.escape_ascii()
            ))
        })
    }

    fn link_target<R: Read>(entry: &tar::Entry<'_, R>, name: &str) -> Result<PathBuf> {
        entry
            .link_name()
            .map_err(structural_error)?
            .map(|target| target.into_owned())
            .ok_or_else(|| ExtractionError::BadArchive(format!("link entry without target: {name}")))
    }
}
