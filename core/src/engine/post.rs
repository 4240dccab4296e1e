use crate::backend::{ReportStrategy, SECRET_FLAGS};
use crate::config::{AppConfig, RunPaths};
use crate::error::RunError;
use crate::outcome::summarize_results;
use crate::runner::ProcessRunner;

pub(super) fn log_summary(paths: &RunPaths) {
    match summarize_results(&paths.results_jsonl) {
        Ok(s) => tracing::info!(
            total = s.total,
            succeeded = s.succeeded,
            failed = s.failed,
            malformed = s.malformed,
            success_rate = s.success_rate(),
            "results summary"
        ),
        Err(e) => tracing::debug!(error = %e, "no results to summarize"),
    }
}

/// Runs the report generator. Any failure comes back as
/// [`RunError::ReportGeneration`] for the caller to log.
pub(super) async fn generate_report(
    cfg: &AppConfig,
    paths: &RunPaths,
    report: &dyn ReportStrategy,
    runner: &dyn ProcessRunner,
) -> Result<(), RunError> {
    let Some(spec) = report.plan(cfg, paths) else {
        tracing::info!(report = report.name(), "report inputs missing, skipping report");
        return Ok(());
    };

    tracing::info!(
        report = report.name(),
        cmd = %spec.redacted(SECRET_FLAGS),
        "generating report"
    );
    match runner.run(&spec).await {
        Ok(0) => {
            tracing::info!(path = %paths.report_html.display(), "report generated");
            Ok(())
        }
        Ok(code) => Err(RunError::ReportGeneration(format!(
            "{} exited with code {code}",
            report.name()
        ))),
        Err(e) => Err(RunError::ReportGeneration(e.to_string())),
    }
}
