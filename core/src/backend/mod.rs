//! Seams for the external Python collaborators.
//!
//! Strategies only plan command lines; spawning belongs to
//! [`crate::runner::ProcessRunner`].

use crate::config::{AppConfig, RunPaths};
use crate::runner::ProcessSpec;

/// Flags whose values never reach the logs.
pub const SECRET_FLAGS: &[&str] = &["--eas_token"];

pub trait EvaluatorStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn plan(&self, cfg: &AppConfig, paths: &RunPaths) -> ProcessSpec;
}

pub trait ReportStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when the inputs the generator needs are not there.
    fn plan(&self, cfg: &AppConfig, paths: &RunPaths) -> Option<ProcessSpec>;
}
