//! Result of a single command execution.

use std::fmt;

use serde::Serialize;

/// Why an execution was judged a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Failure {
    /// The process could not be started or its output could not be read.
    Spawn { reason: String },
    /// The process exited unsuccessfully. `code` is `None` when it was killed
    /// by a signal.
    NonZeroExit { code: Option<i32> },
    /// Exited 0 but wrote output under `outputGTZero`.
    OutputPresent,
    /// Exited 0 but its output matched the error pattern.
    OutputMatched { pattern: String },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Spawn { reason } => write!(f, "failed to start: {reason}"),
            Failure::NonZeroExit { code: Some(code) } => write!(f, "exited with code {code}"),
            Failure::NonZeroExit { code: None } => write!(f, "terminated by signal"),
            Failure::OutputPresent => write!(f, "produced output"),
            Failure::OutputMatched { pattern } => {
                write!(f, "output matched error pattern '{pattern}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyscallOutput {
    /// Whether the execution passed its check policy.
    pub ok: bool,
    /// Combined stdout/stderr with surrounding whitespace trimmed.
    pub output: String,
    pub exit_code: Option<i32>,
    pub failure: Option<Failure>,
}

impl SyscallOutput {
    pub fn succeeded(output: String, exit_code: Option<i32>) -> Self {
        Self {
            ok: true,
            output,
            exit_code,
            failure: None,
        }
    }

    pub fn failed(failure: Failure, output: String, exit_code: Option<i32>) -> Self {
        Self {
            ok: false,
            output,
            exit_code,
            failure: Some(failure),
        }
    }
}
