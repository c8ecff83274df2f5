//! osc-common - facade over `osc-common-core`
//!
//! Services depend on this crate and get the logging, subprocess and string
//! helpers under one name.
pub use osc_common_core::*;
