//! High-level public API for archive extraction.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::extraction::DirectoryRecording;
use crate::extraction::ExtractionEngine;
use crate::extraction::atomic_extract;
use crate::formats::ArchiveFormat;
use crate::formats::TarGzArchive;
use crate::formats::ZipArchive;
use crate::formats::detect::ArchiveType;
use crate::formats::detect::detect_format;
use crate::fs::FileSystem;
use crate::fs::OsFileSystem;

/// Extracts an archive to the specified output directory.
///
/// The archive format is detected from the file extension. The output
/// directory is created if absent.
///
/// # Errors
///
/// Returns an error if:
/// - The archive format is unsupported (`UnsupportedFormat`)
/// - The archive file does not exist (`NotFound`)
/// - The container is corrupt or truncated (`BadArchive`)
/// - An entry would land outside the output directory (`PathEscape`)
/// - Any filesystem operation fails (`Io`)
///
/// # Examples
///
/// ```no_run
/// use decant_core::ExtractConfig;
/// use decant_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractConfig::default();
/// let report = extract_archive("archive.tar.gz", "/tmp/output", &config)?;
/// println!("Extracted {} files", report.files_extracted);
/// for dir in &report.directories {
///     println!("created {dir}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
) -> Result<ExtractionReport> {
    extract_archive_with_progress(archive_path, output_dir, config, &mut NoopProgress)
}

/// Like [`extract_archive`], reporting each entry to `progress`.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    let archive_type = detect_format(archive_path)?;
    extract_with(
        &OsFileSystem,
        archive_type,
        archive_path,
        output_dir.as_ref(),
        config,
        progress,
    )
}

/// Extracts a ZIP archive regardless of its file extension.
///
/// # Errors
///
/// See [`extract_archive`]; `UnsupportedFormat` is never returned.
pub fn extract_zip<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
) -> Result<ExtractionReport> {
    extract_zip_with_progress(archive_path, output_dir, config, &mut NoopProgress)
}

/// Like [`extract_zip`], reporting each entry to `progress`.
///
/// # Errors
///
/// See [`extract_zip`].
pub fn extract_zip_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    extract_with(
        &OsFileSystem,
        ArchiveType::Zip,
        archive_path.as_ref(),
        output_dir.as_ref(),
        config,
        progress,
    )
}

/// Extracts a gzip-compressed TAR archive regardless of its file extension.
///
/// # Errors
///
/// See [`extract_archive`]; `UnsupportedFormat` is never returned.
pub fn extract_tar_gz<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
) -> Result<ExtractionReport> {
    extract_tar_gz_with_progress(archive_path, output_dir, config, &mut NoopProgress)
}

/// Like [`extract_tar_gz`], reporting each entry to `progress`.
///
/// # Errors
///
/// See [`extract_tar_gz`].
pub fn extract_tar_gz_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    extract_with(
        &OsFileSystem,
        ArchiveType::TarGz,
        archive_path.as_ref(),
        output_dir.as_ref(),
        config,
        progress,
    )
}

/// Extracts a ZIP archive with default settings and returns the created
/// sub-directories, relative to `dest`, in first-seen order.
///
/// # Errors
///
/// See [`extract_archive`].
///
/// # Examples
///
/// ```
/// use decant_core::test_utils::ZipTestBuilder;
/// use decant_core::test_utils::write_archive;
/// use decant_core::unzip;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let data = ZipTestBuilder::new()
///     .add_file("a/b.txt", b"hi")
///     .add_directory("a/c/")
///     .build();
/// let archive = write_archive(temp.path(), "sample.zip", &data);
///
/// let dirs = unzip(&archive, temp.path().join("out")).unwrap();
/// assert_eq!(dirs, vec!["a", "a/c"]);
/// ```
pub fn unzip<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<Vec<String>> {
    extract_zip(src, dest, &ExtractConfig::default()).map(ExtractionReport::into_directories)
}

/// Extracts a gzip-compressed TAR archive with default settings and returns
/// the sub-directories implied by its non-directory entries.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn untar_gz<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<Vec<String>> {
    extract_tar_gz(src, dest, &ExtractConfig::default()).map(ExtractionReport::into_directories)
}

/// Extracts `archive_path` as `archive_type` through the given filesystem.
///
/// When `config.atomic` is set, entries are written into a hidden sibling
/// of `output_dir` that is renamed into place only after every entry
/// succeeded; the staging directory itself is managed with `std::fs`.
///
/// # Errors
///
/// See [`extract_archive`].
pub fn extract_with(
    fs: &dyn FileSystem,
    archive_type: ArchiveType,
    archive_path: &Path,
    output_dir: &Path,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    debug!(
        "extracting {} archive {} into {}",
        archive_type.name(),
        archive_path.display(),
        output_dir.display()
    );

    if config.atomic {
        atomic_extract(output_dir, |staging| {
            run(fs, archive_type, archive_path, staging, config, progress)
        })
    } else {
        run(fs, archive_type, archive_path, output_dir, config, progress)
    }
}

fn run(
    fs: &dyn FileSystem,
    archive_type: ArchiveType,
    archive_path: &Path,
    output_dir: &Path,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    match archive_type {
        ArchiveType::Zip => {
            let mut archive = ZipArchive::new(open_archive(fs, archive_path)?)?;
            let mut engine = ExtractionEngine::new(
                fs,
                output_dir,
                config,
                archive.directory_recording(),
                progress,
            )?;
            archive.extract(&mut engine)?;
            Ok(engine.finish())
        }
        ArchiveType::TarGz => {
            // The destination exists before the source is opened.
            let mut engine = ExtractionEngine::new(
                fs,
                output_dir,
                config,
                DirectoryRecording::ImpliedOnly,
                progress,
            )?;
            let mut archive = TarGzArchive::new(open_archive(fs, archive_path)?);
            archive.extract(&mut engine)?;
            Ok(engine.finish())
        }
    }
}

fn open_archive(fs: &dyn FileSystem, path: &Path) -> Result<BufReader<File>> {
    let file = fs
        .open_read(path)
        .map_err(|e| ExtractionError::not_found_or_io(e, path))?;
    Ok(BufReader::new(file))
}
