//! # jport-common
//!
//! Everything around the per-stage crates: the migration planner, the
//! `jport.toml` configuration model and the pipeline that runs one or many
//! Java units through parse, map, plan, generate and validate.

pub mod config;
pub mod pipeline;
pub mod planner;

pub use config::{ConfigError, JportConfig};
pub use pipeline::{MigrationOutcome, Pipeline, PipelineError, SourceUnit};
pub use planner::{ComplexityPolicy, Planner, plan, summarize};

pub type Result<T> = std::result::Result<T, PipelineError>;
