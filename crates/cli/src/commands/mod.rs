pub mod run;

pub use run::{build_request, exit_code_for, resolve_exit, run_command};
