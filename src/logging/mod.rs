//! Logging utilities.
//!
//! This module centralizes logger initialization. The demo's diagnostic
//! contract is a plain-text debug log file, so the default configuration
//! routes the standard `log` facade into `debug.log` in the working
//! directory, truncating any previous run's output.

mod init;

pub use init::{init_logging, LogTarget, LoggingConfig};
