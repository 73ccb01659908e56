//! Single-file copy that preserves symlinks and permission bits.

use std::path::Path;
use std::path::PathBuf;

use log::debug;

use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::transfer_to_file;
use crate::fs::FileSystem;
use crate::fs::OsFileSystem;

/// What [`copy_file`] produced at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// A regular file with this many bytes was written.
    File {
        /// Bytes transferred.
        bytes: u64,
    },
    /// A symlink with the same target string as the source was created.
    Symlink {
        /// Target string of the new link.
        target: PathBuf,
    },
}

/// Copies `source` to `destination` on the host filesystem.
///
/// See [`copy_file_with`] for the exact semantics.
///
/// # Examples
///
/// ```no_run
/// use decant_core::copy_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// copy_file("Cargo.toml", "/tmp/Cargo.toml.bak")?;
/// # Ok(())
/// # }
/// ```
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<CopyOutcome> {
    copy_file_with(&OsFileSystem, source.as_ref(), destination.as_ref())
}

/// Copies `source` to `destination` through `fs`.
///
/// If `source` is a symlink (checked without following it), a new symlink
/// with the identical target string is created at `destination`; the
/// link's target is never opened. Otherwise the bytes are streamed into a
/// newly created (or truncated) `destination`, after which its permission
/// bits are set to those of `source`.
///
/// # Errors
///
/// - `NotFound` if `source` cannot be stat'd or opened because it is missing
/// - `Io` if the transfer, symlink creation, or permission change fails
pub fn copy_file_with(fs: &dyn FileSystem, source: &Path, destination: &Path) -> Result<CopyOutcome> {
    let link_meta = fs
        .symlink_metadata(source)
        .map_err(|e| ExtractionError::not_found_or_io(e, source))?;

    if link_meta.file_type().is_symlink() {
        let target = fs.read_link(source)?;
        fs.symlink(&target, destination)?;
        debug!(
            "recreated symlink {} -> {}",
            destination.display(),
            target.display()
        );
        return Ok(CopyOutcome::Symlink { target });
    }

    let mut reader = fs
        .open_read(source)
        .map_err(|e| ExtractionError::not_found_or_io(e, source))?;
    let perms = fs
        .metadata(source)
        .map_err(|e| ExtractionError::not_found_or_io(e, source))?
        .permissions();

    let mut buffer = CopyBuffer::new();
    let bytes = transfer_to_file(fs, &mut reader, destination, &mut buffer)?;
    fs.set_permissions(destination, perms)?;

    debug!(
        "copied {} bytes from {} to {}",
        bytes,
        source.display(),
        destination.display()
    );
    Ok(CopyOutcome::File { bytes })
}
