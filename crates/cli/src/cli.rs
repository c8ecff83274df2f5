use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use osc_common_core::logging::DEFAULT_PREFIX_NAME;

use crate::commands::run_command;

/// Run a command and judge the result by exit status or output
#[derive(Parser, Debug)]
#[command(name = "osc-exec")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:
    RUST_LOG=debug         Enable debug logging
    OSC_IS_TESTING=true    Suppress all but fatal log lines and never exit on them"
)]
pub struct Cli {
    /// Error check type: nonZeroExit (default) or outputGTZero
    #[arg(short, long, value_name = "TYPE")]
    pub check: Option<String>,

    /// With outputGTZero, only output matching this regex is an error
    #[arg(short, long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Load the request from a JSON file instead of the command line
    #[arg(
        short,
        long,
        value_name = "FILE",
        conflicts_with_all = ["check", "pattern", "command"]
    )]
    pub request: Option<PathBuf>,

    /// Name shown in log prefixes
    #[arg(long, default_value = DEFAULT_PREFIX_NAME)]
    pub prefix: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Do not echo the captured output
    #[arg(short, long)]
    pub quiet: bool,

    /// Program and arguments to run, usually after `--`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Execute the command, returning the exit status to finish with
    pub fn execute(&self) -> Result<i32> {
        let stdout = std::io::stdout();
        run_command(self, &mut stdout.lock())
    }
}
