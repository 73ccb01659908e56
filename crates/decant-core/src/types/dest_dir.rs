//! Validated destination root for extraction.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::fs::FileSystem;

use super::EntryPath;

/// A canonical, existing destination directory.
///
/// # Security Properties
///
/// The root is canonicalized once at construction. Every path handed out by
/// [`DestDir::join`] is the root plus a normalized [`EntryPath`], and
/// [`DestDir::ensure_contained`] re-checks the on-disk state so that a
/// symlink already present inside the root cannot redirect a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Opens `path` as a destination, creating it (and missing ancestors)
    /// if absent.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the path exists but is not a directory, cannot be
    /// created, or cannot be canonicalized.
    pub fn prepare(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.path_exists(path) {
            fs.create_dir_all(path)?;
        } else if !fs.is_dir(path) {
            return Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = fs.canonicalize(path).map_err(|e| {
            ExtractionError::Io(io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the canonical root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a normalized entry path onto the root.
    #[inline]
    #[must_use]
    pub fn join(&self, entry: &EntryPath) -> PathBuf {
        self.0.join(entry.to_path_buf())
    }

    /// Verifies that `entry` still resolves inside the root on disk.
    ///
    /// Walks up from `root/entry` to the deepest path that exists (without
    /// following a final symlink), canonicalizes it, and requires the
    /// result to stay under the root. A dangling symlink on the way counts
    /// as an escape.
    ///
    /// # Errors
    ///
    /// Returns `PathEscape` if the existing prefix resolves outside the
    /// root, or `Io` if the filesystem cannot be queried.
    pub fn ensure_contained(&self, fs: &dyn FileSystem, entry: &EntryPath) -> Result<()> {
        let escape = || ExtractionError::PathEscape {
            path: PathBuf::from(entry.as_str()),
        };

        let mut probe = self.join(entry);
        loop {
            match fs.symlink_metadata(&probe) {
                Ok(_) => {
                    let canonical = match fs.canonicalize(&probe) {
                        Ok(c) => c,
                        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(escape()),
                        Err(e) => return Err(ExtractionError::Io(e)),
                    };
                    if canonical.starts_with(&self.0) {
                        return Ok(());
                    }
                    return Err(escape());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if !probe.pop() || probe == self.0 {
                        return Ok(());
                    }
                }
                Err(e) => return Err(ExtractionError::Io(e)),
            }
        }
    }

    /// Verifies that a symlink at `link` pointing to `target` resolves
    /// inside the root, taking symlinks already on disk into account.
    ///
    /// The target is first resolved lexically against the entry name. It
    /// is then walked from the canonical on-disk parent of the link: each
    /// existing component is canonicalized, and every intermediate result
    /// must stay under the root. Links materialized by earlier entries
    /// (`a -> .` followed by `a/link -> ../x`) are therefore seen for what
    /// they are.
    ///
    /// # Errors
    ///
    /// Returns `SymlinkEscape` if the target is absolute or leaves the root,
    /// `PathEscape` if the link's own parent escapes, or `Io` if the
    /// filesystem cannot be queried.
    pub fn ensure_link_contained(
        &self,
        fs: &dyn FileSystem,
        link: &EntryPath,
        target: &Path,
    ) -> Result<()> {
        let escape = || ExtractionError::SymlinkEscape {
            path: PathBuf::from(link.as_str()),
        };

        if link.resolve_link_target(target).is_none() {
            return Err(escape());
        }

        let mut resolved = match link.parent() {
            Some(parent) => {
                self.ensure_contained(fs, &parent)?;
                self.canonical_existing(fs, &self.join(&parent))?
            }
            None => self.0.clone(),
        };

        let target = target.to_string_lossy().replace('\\', "/");
        for segment in target.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    if !resolved.pop() {
                        return Err(escape());
                    }
                }
                normal => {
                    resolved.push(normal);
                    if fs.symlink_metadata(&resolved).is_ok() {
                        resolved = fs.canonicalize(&resolved).map_err(|e| {
                            if e.kind() == io::ErrorKind::NotFound {
                                escape()
                            } else {
                                ExtractionError::Io(e)
                            }
                        })?;
                    }
                }
            }
            if !resolved.starts_with(&self.0) {
                return Err(escape());
            }
        }

        Ok(())
    }

    /// Canonicalizes a directory that extraction has already created.
    fn canonical_existing(&self, fs: &dyn FileSystem, path: &Path) -> Result<PathBuf> {
        let canonical = fs.canonicalize(path)?;
        if canonical.starts_with(&self.0) {
            Ok(canonical)
        } else {
            Err(ExtractionError::PathEscape {
                path: path.strip_prefix(&self.0).unwrap_or(path).to_path_buf(),
            })
        }
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_existing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();
        assert!(dest.as_path().is_absolute());
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_prepare_creates_missing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let target = temp.path().join("out").join("nested");
        let dest = DestDir::prepare(&OsFileSystem, &target).unwrap();
        assert!(target.is_dir());
        assert!(dest.as_path().ends_with("out/nested"));
    }

    #[test]
    fn test_prepare_rejects_file() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file_path = temp.path().join("file.txt");
        fs::write(&file_path, "test").unwrap();

        let result = DestDir::prepare(&OsFileSystem, &file_path);
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }

    #[test]
    fn test_join() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();
        let entry = EntryPath::parse("foo/bar.txt").unwrap();

        let joined = dest.join(&entry);
        assert!(joined.starts_with(dest.as_path()));
        assert!(joined.ends_with("foo/bar.txt"));
    }

    #[test]
    fn test_ensure_contained_missing_path() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();
        let entry = EntryPath::parse("not/yet/created.txt").unwrap();
        assert!(dest.ensure_contained(&OsFileSystem, &entry).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_contained_symlinked_dir_outside() {
        let outside = TempDir::new().expect("failed to create temp dir");
        let temp = TempDir::new().expect("failed to create temp dir");
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();

        let entry = EntryPath::parse("escape/payload.txt").unwrap();
        assert!(matches!(
            dest.ensure_contained(&OsFileSystem, &entry),
            Err(ExtractionError::PathEscape { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_contained_dangling_symlink() {
        let temp = TempDir::new().expect("failed to create temp dir");
        std::os::unix::fs::symlink("/nonexistent/decant-target", temp.path().join("dangling"))
            .unwrap();
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();

        let entry = EntryPath::parse("dangling").unwrap();
        assert!(matches!(
            dest.ensure_contained(&OsFileSystem, &entry),
            Err(ExtractionError::PathEscape { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_contained_symlink_inside() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink("real", temp.path().join("alias")).unwrap();
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();

        let entry = EntryPath::parse("alias/file.txt").unwrap();
        assert!(dest.ensure_contained(&OsFileSystem, &entry).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_link_through_extracted_symlink_escapes() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(&OsFileSystem, &temp.path().join("out")).unwrap();
        std::os::unix::fs::symlink(".", dest.as_path().join("a")).unwrap();

        let link = EntryPath::parse("a/link").unwrap();
        assert!(link.resolve_link_target(Path::new("../outside")).is_some());
        assert!(matches!(
            dest.ensure_link_contained(&OsFileSystem, &link, Path::new("../outside")),
            Err(ExtractionError::SymlinkEscape { .. })
        ));

        let top = EntryPath::parse("link").unwrap();
        assert!(matches!(
            dest.ensure_link_contained(&OsFileSystem, &top, Path::new("a/../outside")),
            Err(ExtractionError::SymlinkEscape { .. })
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_link_within_root_accepted() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::prepare(&OsFileSystem, temp.path()).unwrap();
        fs::create_dir_all(dest.as_path().join("pkg/lib")).unwrap();
        std::os::unix::fs::symlink("pkg", dest.as_path().join("alias")).unwrap();

        let link = EntryPath::parse("pkg/lib/link").unwrap();
        assert!(dest.ensure_link_contained(&OsFileSystem, &link, Path::new("../data.txt")).is_ok());

        let via_alias = EntryPath::parse("alias/lib/link").unwrap();
        assert!(dest
            .ensure_link_contained(&OsFileSystem, &via_alias, Path::new("../../alias/x"))
            .is_ok());
        assert!(matches!(
            dest.ensure_link_contained(&OsFileSystem, &link, Path::new("/etc/passwd")),
            Err(ExtractionError::SymlinkEscape { .. })
        ));
    }

    /// Counts canonicalizations and forwards everything to the host.
    #[derive(Default)]
    struct CountingFs {
        canonicalized: std::cell::Cell<usize>,
    }

    impl FileSystem for CountingFs {
        fn path_exists(&self, path: &Path) -> bool {
            OsFileSystem.path_exists(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            OsFileSystem.is_dir(path)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            OsFileSystem.create_dir_all(path)
        }

        fn open_read(&self, path: &Path) -> io::Result<fs::File> {
            OsFileSystem.open_read(path)
        }

        fn create_file(&self, path: &Path) -> io::Result<fs::File> {
            OsFileSystem.create_file(path)
        }

        fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
            OsFileSystem.symlink_metadata(path)
        }

        fn metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
            OsFileSystem.metadata(path)
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            self.canonicalized.set(self.canonicalized.get() + 1);
            OsFileSystem.canonicalize(path)
        }

        fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
            OsFileSystem.read_link(path)
        }

        fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
            OsFileSystem.symlink(target, link)
        }

        fn set_permissions(&self, path: &Path, perms: fs::Permissions) -> io::Result<()> {
            OsFileSystem.set_permissions(path, perms)
        }
    }

    #[test]
    fn test_containment_queries_go_through_filesystem() {
        let temp = TempDir::new().expect("failed to create temp dir");
        fs::create_dir(temp.path().join("sub")).unwrap();
        let counting = CountingFs::default();

        let dest = DestDir::prepare(&counting, temp.path()).unwrap();
        assert_eq!(counting.canonicalized.get(), 1);

        let entry = EntryPath::parse("sub/new.txt").unwrap();
        dest.ensure_contained(&counting, &entry).unwrap();
        assert_eq!(counting.canonicalized.get(), 2);
    }
}
