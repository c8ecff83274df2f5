use std::io::Write;

use anyhow::{Context, Result};
use osc_common_core::logging::{self, LoggerConfig};
use osc_common_core::{CheckPolicy, Failure, Syscall, SyscallOutput};
use tracing::debug;

use crate::cli::Cli;
use crate::display::print_result;

pub fn run_command(cli: &Cli, out: &mut impl Write) -> Result<i32> {
    let request = build_request(cli)?;
    let result = request.exec()?;
    debug!("Result: ok={} exit_code={:?}", result.ok, result.exit_code);

    print_result(&result, cli.json, cli.quiet, out)?;

    Ok(exit_code_for(&result))
}

pub fn build_request(cli: &Cli) -> Result<Syscall> {
    if let Some(ref path) = cli.request {
        return Syscall::from_file(path)
            .with_context(|| format!("Failed to load request from {}", path.display()));
    }

    let check: CheckPolicy = cli.check.as_deref().unwrap_or_default().parse()?;
    let mut request = Syscall::new(cli.command.iter().cloned()).with_check(check);
    if let Some(ref pattern) = cli.pattern {
        request = request.with_output_error_pattern(pattern.clone());
    }

    Ok(request)
}

/// Exit status that mirrors the result: the child's own code for a failed
/// exit, 1 for any other failure.
pub fn exit_code_for(result: &SyscallOutput) -> i32 {
    match result.failure {
        None => 0,
        Some(Failure::NonZeroExit { code }) => code.unwrap_or(1),
        Some(_) => 1,
    }
}

/// Turn the outcome of a run into the status `main` finishes with. The fatal
/// line has already been written for unrecoverable errors; whether to
/// terminate is up to the logger config.
pub fn resolve_exit(config: &LoggerConfig, outcome: Result<i32>) -> Result<i32> {
    let err = match outcome {
        Ok(code) => return Ok(code),
        Err(err) => err,
    };

    match err.downcast_ref::<osc_common_core::Error>() {
        Some(core_err) if core_err.is_unrecoverable() => {
            Ok(logging::fatal_exit_code(config, core_err).unwrap_or(0))
        }
        _ => Err(err),
    }
}
