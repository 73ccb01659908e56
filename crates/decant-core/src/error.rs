//! Error types for archive extraction operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Coarse classification of an [`ExtractionError`].
///
/// Callers that only need to branch on the failure class (retry, report,
/// abort) can match on this instead of the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The container's structure could not be parsed.
    BadArchive,
    /// The source archive or a referenced source file does not exist.
    NotFound,
    /// A filesystem read, write, or metadata operation failed.
    IoFailure,
    /// An entry would be materialized outside the destination root.
    PathEscape,
    /// The archive type could not be determined.
    Unsupported,
}

/// Errors that can occur during archive extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    BadArchive(String),

    /// Source path does not exist or cannot be opened.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Entry path resolves outside the destination root.
    #[error("path escapes destination root: {path}")]
    PathEscape {
        /// The offending entry path, as stored in the archive.
        path: PathBuf,
    },

    /// Symlink entry points outside the destination root.
    #[error("symlink target outside destination root: {path}")]
    SymlinkEscape {
        /// The symlink entry path.
        path: PathBuf,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,
}

impl ExtractionError {
    /// Builds a `NotFound` error for `path` when `err` is a missing-file
    /// error, and passes every other error through as `Io`.
    pub(crate) fn not_found_or_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }

    /// Returns the failure class of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::ErrorKind;
    /// use decant_core::ExtractionError;
    ///
    /// let err = ExtractionError::BadArchive("bad header".to_string());
    /// assert_eq!(err.kind(), ErrorKind::BadArchive);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::IoFailure,
            Self::BadArchive(_) => ErrorKind::BadArchive,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PathEscape { .. } | Self::SymlinkEscape { .. } => ErrorKind::PathEscape,
            Self::UnsupportedFormat => ErrorKind::Unsupported,
        }
    }

    /// Returns `true` if this error was raised by path containment checks.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::PathEscape {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::UnsupportedFormat;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathEscape { .. } | Self::SymlinkEscape { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::ExtractionError;
    ///
    /// let err = ExtractionError::BadArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    ///
    /// let err = ExtractionError::UnsupportedFormat;
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::BadArchive(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::BadArchive(other.to_string()),
        }
    }
}
