use vlmrun_core::api as core_api;

use crate::backend::python_script;

pub const HTML_REPORT_SCRIPT: &str = "generate_html_report.py";

/// Per-image HTML gallery for analyzer runs.
pub struct HtmlReport;

impl core_api::ReportStrategy for HtmlReport {
    fn name(&self) -> &str {
        "html"
    }

    fn plan(
        &self,
        cfg: &core_api::AppConfig,
        paths: &core_api::RunPaths,
    ) -> Option<core_api::ProcessSpec> {
        if !paths.results_jsonl.is_file() {
            return None;
        }
        Some(
            python_script(cfg, HTML_REPORT_SCRIPT)
                .flag("--results_jsonl", paths.results_jsonl.display())
                .flag("--output_html", paths.report_html.display())
                .flag("--image_dir", cfg.evaluator.image_dir.display())
                .flag("--intermediate_dir", paths.intermediate_dir.display())
                .flag_if(cfg.logging.debug, "--debug"),
        )
    }
}
