use anyhow::Result;
use clap::Parser;
use osc_common_core::logging::{self, LoggerConfig};
use osc_exec::Cli;
use osc_exec::commands::resolve_exit;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // OSC_IS_TESTING and RUST_LOG are read here, once
    let config = LoggerConfig::from_env().with_prefix_name(&cli.prefix);
    logging::init(&config)?;

    let code = resolve_exit(&config, cli.execute())?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
