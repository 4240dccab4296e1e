use std::path::PathBuf;

use thiserror::Error;

use super::{ConfigError, RunnerError};

/// Every way a batch run can end badly.
///
/// [`RunError::ReportGeneration`] never ends a run; the engine logs it and
/// keeps the primary outcome.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("input validation failed: {0}")]
    InputValidation(String),

    #[error("evaluator exited with code {code}")]
    ChildProcess { code: i32 },

    #[error("output not generated: {}", path.display())]
    OutputMissing { path: PathBuf },

    #[error("API errors with no successful results")]
    TransientApi,

    #[error("report generation failed: {0}")]
    ReportGeneration(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("io error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        RunError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this error. A failed child keeps its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::ChildProcess { code } => *code,
            _ => 1,
        }
    }
}
