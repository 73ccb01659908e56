//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use decant_core::CopyOutcome;
use decant_core::ExtractionReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    /// Writes one line, ignoring errors from a closed stdout.
    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            self.line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            self.line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, output_dir: &Path, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Extraction complete: {}", output_dir.display()));

        self.line(&format!("  Files extracted: {}", report.files_extracted));
        self.line(&format!("  Directories: {}", report.directories.len()));
        self.line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            self.line(&format!("  Symlinks: {}", report.symlinks_created));
            self.line(&format!("  Skipped: {}", report.entries_skipped));
            self.line(&format!("  Duration: {:?}", report.duration));
            for dir in &report.directories {
                self.line(&format!("  + {dir}/"));
            }
        }

        if report.has_warnings() {
            self.line("");
            if self.use_colors {
                self.line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                self.line("Warnings:");
            }
            for warning in &report.warnings {
                self.line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_copy_result(&self, source: &Path, dest: &Path, outcome: &CopyOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match outcome {
            CopyOutcome::File { bytes } => self.headline(&format!(
                "Copied {} -> {} ({})",
                source.display(),
                dest.display(),
                Self::format_size(*bytes)
            )),
            CopyOutcome::Symlink { target } => self.headline(&format!(
                "Linked {} -> {}",
                dest.display(),
                target.display()
            )),
        }

        Ok(())
    }
}
