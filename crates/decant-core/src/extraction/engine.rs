//! Shared per-entry extraction driver.
//!
//! Format readers walk their container and hand each [`ArchiveEntry`] plus
//! its payload stream to [`ExtractionEngine::process`]. The engine owns the
//! destination root, the transfer buffer, and the accumulating report for
//! exactly one extraction call.

use std::collections::HashSet;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use log::warn;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::fs::FileSystem;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryPath;
use crate::types::EntryType;

/// How directory records in the container are reflected in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRecording {
    /// A directory entry records its own path (ZIP).
    OwnPath,
    /// A directory entry is created but only directories implied by
    /// non-directory entries are recorded (TAR).
    ImpliedOnly,
}

/// Extraction state for one archive into one destination root.
pub struct ExtractionEngine<'a> {
    fs: &'a dyn FileSystem,
    dest: DestDir,
    config: &'a ExtractConfig,
    recording: DirectoryRecording,
    progress: &'a mut dyn ProgressCallback,
    buffer: CopyBuffer,
    created: HashSet<PathBuf>,
    recorded: HashSet<String>,
    report: ExtractionReport,
    entries_seen: usize,
    started: Instant,
}

impl<'a> ExtractionEngine<'a> {
    /// Prepares the destination root (creating it if absent) and a fresh
    /// transfer buffer sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the destination cannot be created or is not a
    /// directory.
    pub fn new(
        fs: &'a dyn FileSystem,
        dest: &Path,
        config: &'a ExtractConfig,
        recording: DirectoryRecording,
        progress: &'a mut dyn ProgressCallback,
    ) -> Result<Self> {
        let dest = DestDir::prepare(fs, dest)?;
        Ok(Self {
            fs,
            dest,
            config,
            recording,
            progress,
            buffer: CopyBuffer::with_capacity(config.effective_buffer_size()),
            created: HashSet::new(),
            recorded: HashSet::new(),
            report: ExtractionReport::new(),
            entries_seen: 0,
            started: Instant::now(),
        })
    }

    /// Returns the canonical destination root.
    #[must_use]
    pub fn dest(&self) -> &DestDir {
        &self.dest
    }

    /// Materializes one entry.
    ///
    /// A directory entry naming the root itself (`./`) is a no-op.
    /// Non-directory entries first get their parent directory (and every
    /// missing ancestor) created and recorded. Files are then streamed from
    /// `payload`; symlinks are created only when allowed; every other kind
    /// is skipped with a warning.
    ///
    /// # Errors
    ///
    /// - `PathEscape` if the entry name or its on-disk location escapes
    /// - `SymlinkEscape` if an allowed symlink points outside the root
    /// - `BadArchive` if the payload is corrupt or shorter than declared
    /// - `Io` on any filesystem failure
    pub fn process<R: Read + ?Sized>(&mut self, entry: &ArchiveEntry, payload: &mut R) -> Result<()> {
        let path = match entry.entry_type {
            EntryType::Directory => EntryPath::parse_dir(&entry.name)?,
            _ => Some(EntryPath::parse(&entry.name)?),
        };
        self.entries_seen += 1;

        let Some(path) = path else {
            // `./` and friends name the root, which already exists
            trace!("entry #{} {:?} names the destination root", self.entries_seen, entry.name);
            return Ok(());
        };
        let host_path = path.to_path_buf();
        self.progress.on_entry_start(&host_path, self.entries_seen);
        debug!("entry #{} {} ({:?})", self.entries_seen, path, entry.entry_type);

        match &entry.entry_type {
            EntryType::Directory => {
                let record = self.recording == DirectoryRecording::OwnPath;
                self.ensure_directories(&path, record)?;
            }
            EntryType::File => {
                self.ensure_parent(&path)?;
                self.write_file(&path, entry, payload)?;
            }
            EntryType::Symlink { target } => {
                self.ensure_parent(&path)?;
                if self.config.allow_symlinks {
                    self.write_symlink(&path, target)?;
                } else {
                    self.skip(&path, "symlink entries are disabled");
                }
            }
            EntryType::Hardlink { .. } => {
                self.ensure_parent(&path)?;
                self.skip(&path, "hard links are not extracted");
            }
            EntryType::Other { description } => {
                self.ensure_parent(&path)?;
                let reason = format!("unsupported entry type: {description}");
                self.skip(&path, &reason);
            }
        }

        self.progress.on_entry_complete(&host_path);
        Ok(())
    }

    /// Completes the call and returns the report.
    #[must_use]
    pub fn finish(mut self) -> ExtractionReport {
        self.report.duration = self.started.elapsed();
        self.progress.on_complete();
        info!(
            "extracted {} files, {} directories into {}",
            self.report.files_extracted,
            self.report.directories.len(),
            self.dest.as_path().display()
        );
        self.report
    }

    fn ensure_parent(&mut self, path: &EntryPath) -> Result<()> {
        match path.parent() {
            Some(parent) => self.ensure_directories(&parent, true),
            None => Ok(()),
        }
    }

    /// Creates every prefix of `dir` that has not been created during this
    /// call, optionally recording each prefix in the report.
    fn ensure_directories(&mut self, dir: &EntryPath, record: bool) -> Result<()> {
        for prefix in dir.prefixes() {
            let full = self.dest.join(&prefix);
            if !self.created.contains(&full) {
                self.dest.ensure_contained(self.fs, &prefix)?;
                if self.fs.is_dir(&full) {
                    trace!("directory {prefix} already present");
                } else {
                    self.fs.create_dir_all(&full)?;
                    self.report.directories_created += 1;
                    trace!("created directory {prefix}");
                }
                self.created.insert(full);
            }

            if record && self.recorded.insert(prefix.as_str().to_string()) {
                self.report.directories.push(prefix.as_str().to_string());
            }
        }
        Ok(())
    }

    fn write_file<R: Read + ?Sized>(
        &mut self,
        path: &EntryPath,
        entry: &ArchiveEntry,
        payload: &mut R,
    ) -> Result<()> {
        self.dest.ensure_contained(self.fs, path)?;
        let output_path = self.dest.join(path);

        let file = self.fs.create_file(&output_path)?;
        let mut writer = BufWriter::with_capacity(self.buffer.size(), file);
        let written = copy_with_buffer(payload, &mut writer, &mut self.buffer)
            .map_err(|e| classify_payload_error(e, path))?;
        writer.flush()?;

        if written < entry.size {
            return Err(ExtractionError::BadArchive(format!(
                "truncated entry {path}: expected {} bytes, got {written}",
                entry.size
            )));
        }

        self.report.files_extracted += 1;
        self.report.bytes_written = self.report.bytes_written.saturating_add(written);
        self.progress.on_bytes_written(written);
        Ok(())
    }

    fn write_symlink(&mut self, path: &EntryPath, target: &Path) -> Result<()> {
        self.dest.ensure_link_contained(self.fs, path, target)?;
        self.dest.ensure_contained(self.fs, path)?;

        let link_path = self.dest.join(path);
        self.fs.symlink(target, &link_path)?;
        self.report.symlinks_created += 1;
        debug!("created symlink {path} -> {}", target.display());
        Ok(())
    }

    fn skip(&mut self, path: &EntryPath, reason: &str) {
        warn!("skipping {path}: {reason}");
        self.report.entries_skipped += 1;
        self.report.add_warning(format!("{path}: {reason}"));
    }
}

/// Read-side failures that indicate corrupt container data are reported as
/// `BadArchive`; everything else stays an I/O failure.
fn classify_payload_error(err: CopyError, path: &EntryPath) -> ExtractionError {
    match err {
        CopyError::Read(e)
            if matches!(
                e.kind(),
                io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof
            ) =>
        {
            ExtractionError::BadArchive(format!("corrupt payload for {path}: {e}"))
        }
        other => other.into(),
    }
}
