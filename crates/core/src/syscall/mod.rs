//! Checked subprocess execution
//!
//! A [`Syscall`] names a command line and the rule used to judge it. Executing
//! it runs the program to completion, captures stdout and stderr as a single
//! interleaved blob, and reports the verdict in a [`SyscallOutput`].
//!
//! Expected failures (the program is missing, exits non-zero, or writes output
//! it should not) come back as `ok == false` plus an error log line. Misuse (an
//! empty command line, an unknown policy name, a broken error pattern) is
//! logged at fatal severity and returned as an unrecoverable [`Error`].

mod output;
mod policy;

pub use output::{Failure, SyscallOutput};
pub use policy::CheckPolicy;

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::fatal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Syscall {
    /// Program followed by its arguments. Passed to the OS as-is, no shell.
    pub cmd_line: Vec<String>,
    #[serde(rename = "errCheckType")]
    pub check: CheckPolicy,
    /// Only consulted by [`CheckPolicy::OutputGtZero`]. `None` or empty means
    /// any output at all is a failure.
    #[serde(rename = "outputErrorPatternMatch")]
    pub output_error_pattern: Option<String>,
}

/// Wire form of a request, with the policy still as text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSyscall {
    cmd_line: Vec<String>,
    #[serde(default)]
    err_check_type: String,
    #[serde(default)]
    output_error_pattern_match: Option<String>,
}

impl TryFrom<RawSyscall> for Syscall {
    type Error = Error;

    fn try_from(raw: RawSyscall) -> Result<Self> {
        Ok(Self {
            cmd_line: raw.cmd_line,
            check: raw.err_check_type.parse()?,
            output_error_pattern: raw.output_error_pattern_match,
        })
    }
}

impl Syscall {
    pub fn new<I, S>(cmd_line: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmd_line: cmd_line.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_check(mut self, check: CheckPolicy) -> Self {
        self.check = check;
        self
    }

    pub fn with_output_error_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.output_error_pattern = Some(pattern.into());
        self
    }

    /// Parse a JSON request (`cmdLine`, `errCheckType`, `outputErrorPatternMatch`).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSyscall = serde_json::from_str(json)?;
        raw.try_into()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Shell-like rendering for log lines.
    pub fn display_command(&self) -> String {
        self.cmd_line
            .iter()
            .map(|arg| {
                if arg.contains(' ') {
                    format!("'{arg}'")
                } else {
                    arg.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command once and judge the result.
    pub fn exec(&self) -> Result<SyscallOutput> {
        let Some((program, args)) = self.cmd_line.split_first() else {
            fatal!("refusing to execute a zero-length command line");
            return Err(Error::EmptyCommandLine);
        };
        let matcher = self.output_matcher()?;

        debug!("Executing: {}", self.display_command());

        let captured = match run_combined(program, args) {
            Ok(captured) => captured,
            Err(err) => {
                error!(error = %err, "could not execute '{}'", self.display_command());
                return Ok(SyscallOutput::failed(
                    Failure::Spawn {
                        reason: err.to_string(),
                    },
                    String::new(),
                    None,
                ));
            }
        };

        let raw = String::from_utf8_lossy(&captured.output);
        let output = raw.trim().to_string();
        let exit_code = captured.status.code();

        // Exit status wins over every policy.
        if !captured.status.success() {
            error!(
                error = %captured.status,
                "'{}' failed, output below:\n{}",
                self.display_command(),
                raw
            );
            return Ok(SyscallOutput::failed(
                Failure::NonZeroExit { code: exit_code },
                output,
                exit_code,
            ));
        }

        match self.check {
            CheckPolicy::NonZeroExit => Ok(SyscallOutput::succeeded(output, exit_code)),
            CheckPolicy::OutputGtZero => {
                if output.is_empty() {
                    return Ok(SyscallOutput::succeeded(output, exit_code));
                }
                match matcher {
                    None => {
                        error!(
                            "'{}' produced output, output below:\n{}",
                            self.display_command(),
                            raw
                        );
                        Ok(SyscallOutput::failed(
                            Failure::OutputPresent,
                            output,
                            exit_code,
                        ))
                    }
                    Some(regex) if regex.is_match(&output) => {
                        error!(
                            "'{}' output matched '{}', output below:\n{}",
                            self.display_command(),
                            regex.as_str(),
                            raw
                        );
                        Ok(SyscallOutput::failed(
                            Failure::OutputMatched {
                                pattern: regex.as_str().to_string(),
                            },
                            output,
                            exit_code,
                        ))
                    }
                    Some(_) => Ok(SyscallOutput::succeeded(output, exit_code)),
                }
            }
        }
    }

    /// Compiled error pattern, when one applies.
    fn output_matcher(&self) -> Result<Option<Regex>> {
        let pattern = match self.output_error_pattern.as_deref() {
            Some(pattern) if !pattern.is_empty() && self.check == CheckPolicy::OutputGtZero => {
                pattern
            }
            _ => return Ok(None),
        };

        match Regex::new(pattern) {
            Ok(regex) => Ok(Some(regex)),
            Err(source) => {
                fatal!(error = %source, "invalid output error pattern '{}'", pattern);
                Err(Error::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            }
        }
    }
}

struct Captured {
    output: Vec<u8>,
    status: ExitStatus,
}

/// Run to completion with stdout and stderr sharing one pipe, so the captured
/// bytes keep the order the child wrote them in.
fn run_combined(program: &str, args: &[String]) -> io::Result<Captured> {
    let (mut reader, writer) = io::pipe()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer);

    let mut child = command.spawn()?;
    // The command still holds the write ends; reading would never see EOF.
    drop(command);

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait()?;
    read?;

    Ok(Captured { output, status })
}
