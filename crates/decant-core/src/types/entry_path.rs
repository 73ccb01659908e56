//! Normalized, containment-checked entry path.

use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// A container-internal entry name reduced to a safe relative path.
///
/// `EntryPath` can only be built through [`EntryPath::parse`], which
/// normalizes separators and rejects anything that could resolve outside
/// the destination root.
///
/// # Examples
///
/// ```
/// use decant_core::types::EntryPath;
///
/// let path = EntryPath::parse("a\\b/./c.txt").unwrap();
/// assert_eq!(path.as_str(), "a/b/c.txt");
///
/// assert!(EntryPath::parse("../etc/passwd").is_err());
/// assert!(EntryPath::parse("/etc/passwd").is_err());
/// assert!(EntryPath::parse("./").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPath {
    segments: Vec<String>,
    joined: String,
}

impl EntryPath {
    /// Parses and normalizes an archive entry name.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject names containing NUL bytes
    /// 2. Convert `\` separators to `/`
    /// 3. Reject absolute names and Windows drive prefixes (`C:/`)
    /// 4. Drop empty and `.` segments
    /// 5. Reject any `..` segment
    /// 6. Reject names that normalize to nothing
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathEscape` if any step rejects the name.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_dir(raw)?.ok_or_else(|| ExtractionError::PathEscape {
            path: PathBuf::from(raw),
        })
    }

    /// Parses a directory entry name, which may name the destination root
    /// itself.
    ///
    /// Returns `Ok(None)` for names such as `./` that normalize to nothing.
    /// Every other rule of [`EntryPath::parse`] applies.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathEscape` for absolute, drive-prefixed,
    /// `..` or NUL-carrying names.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant_core::types::EntryPath;
    ///
    /// assert!(EntryPath::parse_dir("./").unwrap().is_none());
    /// assert_eq!(EntryPath::parse_dir("./sub/").unwrap().unwrap().as_str(), "sub");
    /// assert!(EntryPath::parse_dir("../").is_err());
    /// ```
    pub fn parse_dir(raw: &str) -> Result<Option<Self>> {
        let escape = || ExtractionError::PathEscape {
            path: PathBuf::from(raw),
        };

        if raw.contains('\0') {
            return Err(escape());
        }

        let unified = raw.replace('\\', "/");
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(escape());
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(escape()),
                normal => segments.push(normal.to_string()),
            }
        }

        if segments.is_empty() {
            return Ok(None);
        }

        let joined = segments.join("/");
        Ok(Some(Self { segments, joined }))
    }

    /// Returns the normalized path with `/` separators.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.joined
    }

    /// Returns the path in host form, relative to the destination root.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    /// Number of path segments.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns the parent path, or `None` for a root-level entry.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        let segments = self.segments[..self.segments.len() - 1].to_vec();
        let joined = segments.join("/");
        Some(Self { segments, joined })
    }

    /// Returns every ancestor prefix including `self`, shortest first.
    ///
    /// `a/b/c` yields `a`, `a/b`, `a/b/c`.
    #[must_use]
    pub fn prefixes(&self) -> Vec<Self> {
        (1..=self.segments.len())
            .map(|n| {
                let segments = self.segments[..n].to_vec();
                let joined = segments.join("/");
                Self { segments, joined }
            })
            .collect()
    }

    /// Resolves a symlink `target` relative to this entry's directory.
    ///
    /// Resolution is lexical: `..` pops one segment and must never climb
    /// above the destination root. Returns the resolved root-relative path,
    /// or `None` if the target is absolute or escapes. Symlinks already on
    /// disk are not consulted; see [`DestDir::ensure_link_contained`].
    ///
    /// [`DestDir::ensure_link_contained`]: super::DestDir::ensure_link_contained
    #[must_use]
    pub fn resolve_link_target(&self, target: &Path) -> Option<PathBuf> {
        let target = target.to_string_lossy().replace('\\', "/");
        if target.starts_with('/') || has_drive_prefix(&target) {
            return None;
        }

        let mut resolved: Vec<&str> = self.segments[..self.segments.len() - 1]
            .iter()
            .map(String::as_str)
            .collect();
        for segment in target.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    resolved.pop()?;
                }
                normal => resolved.push(normal),
            }
        }
        Some(resolved.iter().collect())
    }
}

impl std::fmt::Display for EntryPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined)
    }
}

/// `C:/...` everywhere; on Windows also drive-relative `C:name`.
/// Expects `/` separators.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (cfg!(windows) || bytes.get(2).is_none_or(|&b| b == b'/'))
}
