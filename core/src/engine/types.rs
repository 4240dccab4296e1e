use crate::backend::{EvaluatorStrategy, ReportStrategy};
use crate::config::{AppConfig, RunPaths};
use crate::outcome::SignalSet;
use crate::runner::ProcessRunner;

/// Everything one pipeline run needs, borrowed from the caller.
pub struct PipelineArgs<'a> {
    pub cfg: &'a AppConfig,
    pub paths: &'a RunPaths,
    pub evaluator: &'a dyn EvaluatorStrategy,
    pub report: Option<&'a dyn ReportStrategy>,
    pub runner: &'a dyn ProcessRunner,
    pub signals: &'a SignalSet,
}
