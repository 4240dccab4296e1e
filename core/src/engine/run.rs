use crate::backend::SECRET_FLAGS;
use crate::error::RunError;
use crate::input::require_images;
use crate::outcome::{classify, OutcomeRecord, OutcomeStatus, RunResult};

use super::post::{generate_report, log_summary};
use super::pre::{install_requirements, log_position, prepare_dirs, reset_results, resolve_python};
use super::types::PipelineArgs;

/// Runs one batch evaluation end to end and decides how it ended.
///
/// `Err` is reserved for conditions that stop the run before the evaluator
/// finishes (bad configuration, no input, spawn failure). Anything the
/// evaluator itself does wrong comes back as a [`OutcomeStatus::Failure`]
/// record carrying the right exit code.
pub async fn run_pipeline(args: PipelineArgs<'_>) -> Result<OutcomeRecord, RunError> {
    let PipelineArgs {
        cfg,
        paths,
        evaluator,
        report,
        runner,
        signals,
    } = args;

    tracing::info!(
        run_id = %paths.run_id,
        timestamp = %paths.timestamp,
        evaluator = evaluator.name(),
        model = %cfg.eas.model_name,
        output_dir = %paths.output_dir.display(),
        "starting evaluation run"
    );

    prepare_dirs(cfg, paths)?;
    require_images(&cfg.evaluator.image_dir)?;

    let python = resolve_python(cfg)?;
    tracing::debug!(python = %python.display(), "python interpreter resolved");

    install_requirements(cfg, runner).await;
    reset_results(paths)?;

    let spec = evaluator.plan(cfg, paths);
    tracing::info!(cmd = %spec.redacted(SECRET_FLAGS), "launching evaluator");
    // Only the evaluator's own lines count as signals; setup output and the
    // command line above stay out of the scan.
    let log_offset = log_position(paths);
    let exit_code = runner.run(&spec).await?;
    tracing::info!(exit_code, "evaluator finished");

    let outcome = classify(
        &RunResult {
            exit_code,
            output_path: Some(paths.results_jsonl.clone()),
            log_path: paths.log_file.clone(),
            log_offset,
        },
        signals,
    );

    if outcome.status != OutcomeStatus::Failure {
        log_summary(paths);
    }

    let status = outcome.status.as_str();
    match outcome.status {
        OutcomeStatus::Success => {
            tracing::info!(status, successes = outcome.success_count, "{}", outcome.message)
        }
        OutcomeStatus::PartialSuccess => {
            tracing::warn!(status, successes = outcome.success_count, "{}", outcome.message)
        }
        OutcomeStatus::Failure => {
            tracing::error!(status, exit_code = outcome.exit_code, "{}", outcome.message)
        }
    }

    if !outcome.is_failure() && cfg.report.enabled {
        if let Some(report) = report {
            if let Err(e) = generate_report(cfg, paths, report, runner).await {
                tracing::warn!(error = %e, "report generation failed; run result unaffected");
            }
        }
    }

    Ok(outcome)
}
