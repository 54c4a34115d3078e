//! Command-line argument definitions for the DRAKON CLI.
//!
//! Arguments control the input and report paths, configuration file
//! selection, logging verbosity and whether errors in the source abort the
//! run.

use clap::Parser;

/// Command-line arguments for the DRAKON layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input DRAKON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the TOML layout report
    #[arg(short, long, default_value = "out.toml")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Report diagnostics as warnings and lay out whatever could be built
    #[arg(long)]
    pub lenient: bool,
}
