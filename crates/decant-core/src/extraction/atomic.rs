//! Atomic extraction operations.

use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::ExtractionError;
use crate::Result;

/// Runs `extract_fn` against a hidden staging directory and moves the result
/// to `output_dir` only if it succeeds.
///
/// The staging directory is created next to `output_dir` (same parent, so the
/// final rename stays on one filesystem) with a `.decant-` prefix. On failure
/// it is removed and `output_dir` is left untouched.
///
/// # Errors
///
/// Returns `Io` if `output_dir` exists and is not an empty directory, if the
/// staging directory cannot be created, or if the final rename fails. Errors
/// from `extract_fn` are passed through unchanged.
pub fn atomic_extract<T, F>(output_dir: &Path, extract_fn: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let parent = match output_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let replace_empty_dir = match fs::symlink_metadata(output_dir) {
        Ok(meta) if meta.is_dir() => {
            if fs::read_dir(output_dir)?.next().is_some() {
                return Err(ExtractionError::Io(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!(
                        "atomic extraction requires an empty or absent directory: {}",
                        output_dir.display()
                    ),
                )));
            }
            true
        }
        Ok(_) => {
            return Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", output_dir.display()),
            )));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e.into()),
    };

    let staging = tempfile::Builder::new()
        .prefix(".decant-")
        .tempdir_in(parent)?;
    debug!("staging extraction in {}", staging.path().display());

    // TempDir removes the staging tree on drop if extract_fn fails.
    let value = extract_fn(staging.path())?;

    if replace_empty_dir {
        fs::remove_dir(output_dir)?;
    }
    let staged = staging.keep();
    if let Err(e) = fs::rename(&staged, output_dir) {
        let _ = fs::remove_dir_all(&staged);
        return Err(e.into());
    }
    debug!("committed staged extraction to {}", output_dir.display());

    Ok(value)
}
