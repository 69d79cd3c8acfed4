//! jport CLI library
//!
//! Exposes the command implementations for the binary and for tests.

pub mod commands;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod output;

pub use error::CliError;
pub use output::OutputFormat;
