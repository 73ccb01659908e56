//! Format-independent view of one archive entry.

use std::path::PathBuf;

/// Type of entry in an archive.
///
/// # Examples
///
/// ```
/// use decant_core::types::EntryType;
/// use std::path::PathBuf;
///
/// let file = EntryType::File;
/// let symlink = EntryType::Symlink {
///     target: PathBuf::from("../target"),
/// };
/// assert!(file.has_payload());
/// assert!(!symlink.has_payload());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    ///
    /// The target has NOT been validated and must be checked before use.
    Symlink {
        /// The symlink target as stored in the archive.
        target: PathBuf,
    },

    /// Hard link entry. Never materialized.
    Hardlink {
        /// The hard link target as stored in the archive.
        target: PathBuf,
    },

    /// Device node, FIFO, or any other special record. Never materialized.
    Other {
        /// Short description used in warnings.
        description: String,
    },
}

impl EntryType {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }

    /// Returns `true` if the entry's bytes are written to a file.
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        self.is_file()
    }
}

/// One logical record of an open archive.
///
/// Entries are produced by the format readers while the archive handle is
/// open and are consumed immediately; the payload stream is passed
/// alongside, never stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Container-internal name, as stored (forward or back slashes).
    pub name: String,

    /// Kind of record.
    pub entry_type: EntryType,

    /// Declared uncompressed payload size in bytes.
    pub size: u64,
}

impl ArchiveEntry {
    /// Creates an entry record.
    #[must_use]
    pub fn new(name: impl Into<String>, entry_type: EntryType, size: u64) -> Self {
        Self {
            name: name.into(),
            entry_type,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_predicates() {
        assert!(EntryType::File.is_file());
        assert!(EntryType::Directory.is_directory());
        assert!(!EntryType::Directory.has_payload());

        let link = EntryType::Symlink {
            target: PathBuf::from("t"),
        };
        assert!(link.is_symlink());
        assert!(!link.has_payload());

        let hard = EntryType::Hardlink {
            target: PathBuf::from("t"),
        };
        assert!(!hard.is_file());
        assert!(!hard.has_payload());
    }

    #[test]
    fn test_archive_entry_new() {
        let entry = ArchiveEntry::new("a/b.txt", EntryType::File, 2);
        assert_eq!(entry.name, "a/b.txt");
        assert_eq!(entry.size, 2);
        assert!(entry.entry_type.is_file());
    }
}
