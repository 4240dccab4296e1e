use std::path::{Path, PathBuf};

use crate::error::RunError;

use super::results::count_successes;
use super::signal::{LogSignal, SignalSet};

/// What the evaluator left behind once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    pub output_path: Option<PathBuf>,
    pub log_path: PathBuf,
    /// Byte length of the log when the evaluator was launched; earlier lines
    /// belong to the driver and its setup steps.
    pub log_offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    PartialSuccess,
    Failure,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "SUCCESS",
            OutcomeStatus::PartialSuccess => "PARTIAL_SUCCESS",
            OutcomeStatus::Failure => "FAILURE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub status: OutcomeStatus,
    pub success_count: usize,
    pub exit_code: i32,
    pub message: String,
}

impl OutcomeRecord {
    fn success(success_count: usize, message: String) -> Self {
        Self {
            status: OutcomeStatus::Success,
            success_count,
            exit_code: 0,
            message,
        }
    }

    fn failure(err: RunError, success_count: usize) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            success_count,
            exit_code: err.exit_code(),
            message: err.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == OutcomeStatus::Failure
    }
}

/// Decides how a finished run ends. Rules are applied in order and the first
/// one that applies wins:
///
/// 1. a non-zero child exit code is a failure carrying that same code;
/// 2. a missing or empty results file is a failure with code 1;
/// 3. a clean log is a success;
/// 4. a log with transient API errors is a partial success when at least one
///    record succeeded, otherwise a failure with code 1.
pub fn classify(run: &RunResult, signals: &SignalSet) -> OutcomeRecord {
    if run.exit_code != 0 {
        return OutcomeRecord::failure(RunError::ChildProcess { code: run.exit_code }, 0);
    }

    let output = match run.output_path.as_deref() {
        Some(p) if is_non_empty_file(p) => p,
        Some(p) => {
            return OutcomeRecord::failure(RunError::OutputMissing { path: p.to_path_buf() }, 0)
        }
        None => {
            return OutcomeRecord::failure(
                RunError::OutputMissing {
                    path: PathBuf::from("<unset>"),
                },
                0,
            )
        }
    };

    let signal = match signals.scan_file_from(&run.log_path, run.log_offset) {
        Ok(signal) => signal,
        Err(e) => {
            tracing::warn!(
                log = %run.log_path.display(),
                error = %e,
                "run log unreadable, treating as free of API errors"
            );
            LogSignal::NoError
        }
    };

    let (pattern, line) = match signal {
        LogSignal::NoError => {
            return OutcomeRecord::success(
                successes_or_zero(output),
                "evaluation completed successfully".to_string(),
            );
        }
        LogSignal::TransientApiError { pattern, line } => (pattern, line),
    };

    let successes = successes_or_zero(output);
    tracing::debug!(pattern, line, successes, "transient API error found in run log");

    if successes > 0 {
        OutcomeRecord {
            status: OutcomeStatus::PartialSuccess,
            success_count: successes,
            exit_code: 0,
            message: format!(
                "evaluation completed with API errors ({pattern} at log line {line}); {successes} successful result(s) kept"
            ),
        }
    } else {
        OutcomeRecord::failure(RunError::TransientApi, 0)
    }
}

fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

fn successes_or_zero(path: &Path) -> usize {
    count_successes(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "results file unreadable");
        0
    })
}
