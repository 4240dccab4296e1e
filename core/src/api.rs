//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `vlmrun_core::api` instead of reaching into internal modules.

pub use crate::backend::{EvaluatorStrategy, ReportStrategy, SECRET_FLAGS};
pub use crate::config::{
    load_default, validate, AppConfig, EasConfig, EvaluatorConfig, EvaluatorKind, LoggingConfig,
    OutputConfig, ProcessingConfig, ReportConfig, RunPaths, SetupConfig, Subset,
};
pub use crate::engine::{run_pipeline, PipelineArgs};
pub use crate::error::{ConfigError, RunError, RunnerError};
pub use crate::input::{find_images, require_images};
pub use crate::outcome::{
    classify, count_successes, summarize_results, LogSignal, OutcomeRecord, OutcomeStatus,
    ResultsSummary, RunResult, SignalMatcher, SignalSet,
};
pub use crate::runner::exit::{EXIT_FAILURE, EXIT_OK};
pub use crate::runner::{normalize_exit, ProcessRunner, ProcessSpec, TokioProcessRunner, CHILD_TARGET};
