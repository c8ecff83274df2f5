//! osc-common - shared helpers for OpenSourceCorp services
//!
//! This crate provides:
//! - Leveled console logging with `[ name:LEVEL ]` prefixed lines
//! - Checked subprocess execution with output capture and pass/fail policies
//! - A dedent helper for indented multi-line literals
pub mod error;
pub mod logging;
pub mod strings;
pub mod syscall;

#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use logging::{LoggerConfig, Severity};
pub use strings::dedent;
pub use syscall::{CheckPolicy, Failure, Syscall, SyscallOutput};
