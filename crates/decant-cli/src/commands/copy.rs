//! Copy command implementation.

use crate::cli::CopyArgs;
use crate::error::add_copy_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use decant_core::copy_file;

pub fn execute(args: &CopyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let outcome = add_copy_context(copy_file(&args.source, &args.dest), &args.source)?;
    formatter.format_copy_result(&args.source, &args.dest, &outcome)
}
