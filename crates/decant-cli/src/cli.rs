//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "decant")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract archive contents
    Extract(ExtractArgs),
    /// Copy a single file, recreating symlinks and keeping permissions
    Copy(CopyArgs),
    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file (.zip, .tar.gz, .tgz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extract into a temporary directory and move it into place on success
    #[arg(long)]
    pub atomic: bool,

    /// Recreate symlink entries that stay inside the output directory
    #[arg(long)]
    pub allow_symlinks: bool,

    /// Transfer buffer size in bytes (accepts K, M, G suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub buffer_size: Option<usize>,
}

#[derive(clap::Args)]
pub struct CopyArgs {
    /// File or symlink to copy
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination path
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_usize.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_usize.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_usize.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<usize>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
        .and_then(|n| {
            if n == 0 {
                Err("buffer size must be at least 1 byte".to_string())
            } else {
                Ok(n)
            }
        })
}
