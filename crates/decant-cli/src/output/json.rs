//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use decant_core::CopyOutcome;
use decant_core::ExtractionReport;
use serde::Serialize;
use std::io;
use std::io::Write;
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtractionOutput<'a> {
    output_dir: String,
    directories: &'a [String],
    files_extracted: usize,
    directories_created: usize,
    symlinks_created: usize,
    entries_skipped: usize,
    bytes_written: u64,
    duration_ms: u128,
    warnings: &'a [String],
}

impl<'a> ExtractionOutput<'a> {
    fn new(output_dir: &Path, report: &'a ExtractionReport) -> Self {
        Self {
            output_dir: output_dir.display().to_string(),
            directories: &report.directories,
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            symlinks_created: report.symlinks_created,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        }
    }
}

#[derive(Serialize)]
struct CopyOutput {
    source: String,
    dest: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, output_dir: &Path, report: &ExtractionReport) -> Result<()> {
        let output = JsonOutput::success("extract", ExtractionOutput::new(output_dir, report));
        Self::output(&output)
    }

    fn format_copy_result(&self, source: &Path, dest: &Path, outcome: &CopyOutcome) -> Result<()> {
        let (kind, bytes, target) = match outcome {
            CopyOutcome::File { bytes } => ("file", Some(*bytes), None),
            CopyOutcome::Symlink { target } => ("symlink", None, Some(target.display().to_string())),
        };
        let data = CopyOutput {
            source: source.display().to_string(),
            dest: dest.display().to_string(),
            kind,
            bytes,
            target,
        };
        Self::output(&JsonOutput::success("copy", data))
    }
}
