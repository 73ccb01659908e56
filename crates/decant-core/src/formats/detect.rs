//! Archive format detection.

use std::path::Path;

use crate::ExtractionError;
use crate::Result;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// ZIP archive.
    Zip,
    /// Gzip-compressed tar archive.
    TarGz,
}

impl ArchiveType {
    /// Short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
        }
    }
}

/// Detects the archive type from a file path's extension.
///
/// Recognizes `.zip`, `.tar.gz`, `.tgz`, and bare `.gz`, case-insensitively.
///
/// # Errors
///
/// Returns `UnsupportedFormat` for any other extension.
///
/// # Examples
///
/// ```
/// use decant_core::formats::detect::ArchiveType;
/// use decant_core::formats::detect::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("pkg.TGZ")).unwrap(), ArchiveType::TarGz);
/// assert!(detect_format(Path::new("pkg.rar")).is_err());
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or(ExtractionError::UnsupportedFormat)?;

    match extension.to_ascii_lowercase().as_str() {
        "zip" => Ok(ArchiveType::Zip),
        "gz" | "tgz" => Ok(ArchiveType::TarGz),
        _ => Err(ExtractionError::UnsupportedFormat),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_zip() {
        assert_eq!(detect_format(&PathBuf::from("archive.zip")).unwrap(), ArchiveType::Zip);
        assert_eq!(detect_format(&PathBuf::from("ARCHIVE.ZIP")).unwrap(), ArchiveType::Zip);
    }

    #[test]
    fn test_detect_tar_gz() {
        let path = PathBuf::from("archive.tar.gz");
        assert_eq!(detect_format(&path).unwrap(), ArchiveType::TarGz);

        let path2 = PathBuf::from("archive.tgz");
        assert_eq!(detect_format(&path2).unwrap(), ArchiveType::TarGz);
    }

    #[test]
    fn test_detect_unsupported() {
        for name in ["archive.rar", "archive.tar", "archive", "archive.7z"] {
            assert!(
                matches!(
                    detect_format(&PathBuf::from(name)),
                    Err(ExtractionError::UnsupportedFormat)
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn test_archive_type_name() {
        assert_eq!(ArchiveType::Zip.name(), "zip");
        assert_eq!(ArchiveType::TarGz.name(), "tar.gz");
    }
}
