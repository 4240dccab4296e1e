use std::path::{Path, PathBuf};

use crate::config::{AppConfig, RunPaths};
use crate::error::RunError;
use crate::runner::{ProcessRunner, ProcessSpec};

pub(super) fn prepare_dirs(cfg: &AppConfig, paths: &RunPaths) -> Result<(), RunError> {
    let mut dirs = vec![paths.output_dir.as_path(), paths.logs_dir.as_path()];
    if cfg.evaluator.save_intermediate_images {
        dirs.push(paths.intermediate_dir.as_path());
    }
    if let Some(parent) = paths.results_jsonl.parent() {
        if !parent.as_os_str().is_empty() {
            dirs.push(parent);
        }
    }
    for dir in dirs {
        create_dir(dir)?;
    }
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), RunError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| RunError::io(format!("create directory {}", dir.display()), e))
}

pub(super) fn resolve_python(cfg: &AppConfig) -> Result<PathBuf, RunError> {
    which::which(&cfg.evaluator.python).map_err(|e| {
        RunError::Configuration(format!(
            "python interpreter '{}' not found: {e}",
            cfg.evaluator.python
        ))
    })
}

/// Installs the evaluator's requirements. Never fatal: a failed install is
/// logged and the evaluator gets its chance to run anyway.
pub(super) async fn install_requirements(cfg: &AppConfig, runner: &dyn ProcessRunner) {
    let Some(req) = cfg.setup.requirements.as_ref() else {
        return;
    };
    if !req.is_file() {
        tracing::warn!(path = %req.display(), "requirements file not found, skipping dependency install");
        return;
    }

    let spec = ProcessSpec::new(cfg.evaluator.python.clone())
        .arg("-m")
        .arg("pip")
        .arg("install")
        .arg("-q")
        .arg("-r")
        .arg(req.to_string_lossy());
    tracing::info!(path = %req.display(), "installing python dependencies");
    match runner.run(&spec).await {
        Ok(0) => tracing::info!("python dependencies installed"),
        Ok(code) => tracing::warn!(code, "dependency install exited non-zero, continuing"),
        Err(e) => tracing::warn!(error = %e, "dependency install could not start, continuing"),
    }
}

/// The evaluator appends to its results file, so stale records from an
/// earlier run into the same path are cleared first.
pub(super) fn reset_results(paths: &RunPaths) -> Result<(), RunError> {
    if paths.results_jsonl.exists() {
        tracing::info!(path = %paths.results_jsonl.display(), "clearing existing results file");
        std::fs::File::create(&paths.results_jsonl).map_err(|e| {
            RunError::io(
                format!("truncate {}", paths.results_jsonl.display()),
                e,
            )
        })?;
    }
    Ok(())
}

/// Current length of the run log, or 0 when nothing has been written yet.
pub(super) fn log_position(paths: &RunPaths) -> u64 {
    std::fs::metadata(&paths.log_file)
        .map(|m| m.len())
        .unwrap_or(0)
}
