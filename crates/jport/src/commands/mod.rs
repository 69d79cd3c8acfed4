pub mod migrate;
pub mod plan;
pub mod validate;

pub use migrate::*;
pub use plan::*;
pub use validate::*;

use crate::error::{CliError, render_syntax_error};
use jport_common::JportConfig;
use jport_core::SyntaxError;
use std::path::Path;
use std::process::ExitCode;

/// How a command finished when it did not hit an operational error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// A unit failed or validation reported an error.
    Failure,
}

impl CommandStatus {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            CommandStatus::Success
        } else {
            CommandStatus::Failure
        }
    }
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failure => ExitCode::from(1),
        }
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<JportConfig> {
    let cwd = std::env::current_dir()?;
    Ok(JportConfig::discover(explicit, &cwd)?)
}

pub(crate) fn report_syntax_error(path: &Path, source: &str, err: &SyntaxError) {
    eprintln!(
        "{}",
        render_syntax_error(&path.display().to_string(), source, err)
    );
}
