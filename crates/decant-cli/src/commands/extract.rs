//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use decant_core::ExtractConfig;
use decant_core::NoopProgress;
use decant_core::config::DEFAULT_BUFFER_SIZE;
use decant_core::extract_archive_with_progress;
use std::env;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter, silent: bool) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let config = ExtractConfig {
        buffer_size: args.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE),
        allow_symlinks: args.allow_symlinks,
        atomic: args.atomic,
    };

    // Spinner only on an interactive terminal with human output
    let report = if !silent && CliProgress::should_show() {
        let mut progress = CliProgress::new("Extracting");
        add_archive_context(
            extract_archive_with_progress(&args.archive, &output_dir, &config, &mut progress),
            &args.archive,
        )?
    } else {
        let mut noop = NoopProgress;
        add_archive_context(
            extract_archive_with_progress(&args.archive, &output_dir, &config, &mut noop),
            &args.archive,
        )?
    };

    formatter.format_extraction_result(&output_dir, &report)?;

    Ok(())
}
