use vlmrun_core::api as core_api;

use crate::backend::python_script;

pub const EVAL_REPORT_SCRIPT: &str = "generate_eval_report.py";

/// Accuracy report for labelled runs; needs the evaluator's metrics file.
pub struct EvalReport;

impl core_api::ReportStrategy for EvalReport {
    fn name(&self) -> &str {
        "eval"
    }

    fn plan(
        &self,
        cfg: &core_api::AppConfig,
        paths: &core_api::RunPaths,
    ) -> Option<core_api::ProcessSpec> {
        if !paths.results_jsonl.is_file() || !paths.metrics_json.is_file() {
            return None;
        }
        Some(
            python_script(cfg, EVAL_REPORT_SCRIPT)
                .flag("--results", paths.results_jsonl.display())
                .flag("--metrics", paths.metrics_json.display())
                .flag("--output", paths.report_html.display())
                .flag_if(cfg.evaluator.save_intermediate_images, "--include-images"),
        )
    }
}
