//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

/// Ingests a newline-delimited JSON file of market quotes and prints
/// per-time-bucket aggregate statistics.
#[derive(Parser, Debug)]
#[command(name = "quotestat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Newline-delimited JSON input file.
    #[arg(short = 'p', long = "path")]
    pub path: PathBuf,
}
