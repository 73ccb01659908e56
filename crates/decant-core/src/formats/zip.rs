//! ZIP archive format handler.

use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;

use log::debug;

use crate::ExtractionError;
use crate::Result;
use crate::extraction::DirectoryRecording;
use crate::extraction::ExtractionEngine;
use crate::types::ArchiveEntry;
use crate::types::EntryType;

use super::traits::ArchiveFormat;

/// Unix file type mask and symlink type bits as stored in ZIP external
/// attributes.
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Symlink payloads longer than this are treated as corrupt.
const MAX_LINK_TARGET: u64 = 4096;

/// ZIP archive handler.
///
/// ZIP needs random access: the central directory at the end of the file is
/// read first, then entries are visited in central-directory order.
pub struct ZipArchive<R: Read + Seek> {
    inner: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Opens a ZIP container by reading its central directory.
    ///
    /// # Errors
    ///
    /// Returns `BadArchive` if no valid central directory is found, or `Io`
    /// if reading the source fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::formats::ZipArchive;
    /// use decant_core::test_utils::ZipTestBuilder;
    /// use std::io::Cursor;
    ///
    /// let data = ZipTestBuilder::new().add_file("a.txt", b"a").build();
    /// let archive = ZipArchive::new(Cursor::new(data)).unwrap();
    /// assert_eq!(archive.len(), 1);
    /// ```
    pub fn new(source: R) -> Result<Self> {
        let inner = zip::ZipArchive::new(source).map_err(|e| match e {
            zip::result::ZipError::Io(io) if io.kind() != std::io::ErrorKind::UnexpectedEof => {
                ExtractionError::Io(io)
            }
            other => ExtractionError::BadArchive(format!("failed to open ZIP archive: {other}")),
        })?;
        Ok(Self { inner })
    }

    /// Number of entries in the central directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<R: Read + Seek> ArchiveFormat for ZipArchive<R> {
    fn extract(&mut self, engine: &mut ExtractionEngine<'_>) -> Result<()> {
        debug!("ZIP archive with {} entries", self.inner.len());

        for index in 0..self.inner.len() {
            let mut file = self.inner.by_index(index)?;
            let entry = ZipEntryAdapter::to_entry(&mut file)?;
            engine.process(&entry, &mut file)?;
        }

        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "zip"
    }

    fn directory_recording(&self) -> DirectoryRecording {
        DirectoryRecording::OwnPath
    }
}

/// Maps a `zip` crate entry onto [`ArchiveEntry`].
struct ZipEntryAdapter;

impl ZipEntryAdapter {
    fn to_entry<R: Read>(file: &mut zip::read::ZipFile<'_, R>) -> Result<ArchiveEntry> {
        let name = file.name().to_string();
        let size = file.size();

        if file.is_dir() {
            return Ok(ArchiveEntry::new(name, EntryType::Directory, 0));
        }

        if Self::is_symlink(file.unix_mode()) {
            let target = Self::read_link_target(file, &name)?;
            return Ok(ArchiveEntry::new(name, EntryType::Symlink { target }, 0));
        }

        Ok(ArchiveEntry::new(name, EntryType::File, size))
    }

    fn is_symlink(mode: Option<u32>) -> bool {
        mode.is_some_and(|m| m & S_IFMT == S_IFLNK)
    }

    /// Reads the link target stored as the entry payload.
    fn read_link_target<R: Read>(file: &mut zip::read::ZipFile<'_, R>, name: &str) -> Result<PathBuf> {
        let mut target = String::new();
        file.by_ref()
            .take(MAX_LINK_TARGET + 1)
            .read_to_string(&mut target)
            .map_err(|e| ExtractionError::BadArchive(format!("unreadable symlink target for {name}: {e}")))?;

        if target.is_empty() || target.len() as u64 > MAX_LINK_TARGET {
            return Err(ExtractionError::BadArchive(format!(
                "invalid symlink target length for {name}"
            )));
        }
        Ok(PathBuf::from(target))
    }
}
