//! Filesystem collaborator used by the extractors and `copy_file`.
//!
//! Every filesystem query and effect of entry extraction and `copy_file`
//! goes through [`FileSystem`], so a caller can observe or fail individual
//! operations. The staging directory of atomic mode is the exception: it is
//! managed by `tempfile` and `std::fs`. [`OsFileSystem`] is the
//! production implementation backed by `std::fs`.

use std::fs;
use std::fs::File;
use std::fs::Metadata;
use std::fs::Permissions;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Filesystem operations consumed by extraction and copying.
pub trait FileSystem {
    /// Returns `true` if anything exists at `path` (following symlinks).
    fn path_exists(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Creates `path` and every missing ancestor. Succeeds if the directory
    /// already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Opens `path` for reading.
    fn open_read(&self, path: &Path) -> io::Result<File>;

    /// Creates `path` for writing, truncating an existing file.
    fn create_file(&self, path: &Path) -> io::Result<File>;

    /// Queries metadata without following a final symlink.
    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Queries metadata, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Resolves `path` to an absolute path with every symlink followed.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Reads the target string of the symlink at `path`.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Creates a symlink at `link` pointing to `target`.
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Replaces the permission bits of `path`.
    fn set_permissions(&self, path: &Path, perms: Permissions) -> io::Result<()>;
}

/// [`FileSystem`] backed by the host operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn path_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn open_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::symlink_metadata(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }

        #[cfg(windows)]
        {
            if self.is_dir(&link.parent().unwrap_or(link).join(target)) {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = (target, link);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symlinks are not supported on this platform",
            ))
        }
    }

    fn set_permissions(&self, path: &Path, perms: Permissions) -> io::Result<()> {
        fs::set_permissions(path, perms)
    }
}
