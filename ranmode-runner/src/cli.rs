//! CLI argument definitions for ranmode-runner.

use std::path::PathBuf;

use clap::Parser;

/// RAN test-mode runner.
///
/// Starts the core-network and base-station doubles in order, holds the
/// session for the configured duration, tears both down and reports the
/// resolved outcome through the exit code.
#[derive(Parser, Debug)]
#[command(name = "ranmode-runner")]
#[command(version, about, long_about = None)]
pub struct RunnerCli {
    /// Path to ranmode.toml configuration file.
    #[arg(short, long, default_value = "ranmode.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration, print resolved parameters and exit.
    #[arg(long)]
    pub validate: bool,

    /// Override session duration in seconds.
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Write the JSON session report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Run against in-process loopback doubles instead of real services.
    ///
    /// No transport is linked into this binary, so a session only runs in
    /// rehearsal mode and its report is marked as such.
    #[arg(long)]
    pub rehearse: bool,
}
