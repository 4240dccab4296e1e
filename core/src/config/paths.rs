use std::path::PathBuf;

use chrono::{DateTime, Local};
use uuid::Uuid;

use super::types::{AppConfig, EvaluatorKind};

/// Concrete locations for one run, fixed before anything is spawned.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub run_id: String,
    pub timestamp: String,
    pub output_dir: PathBuf,
    pub results_jsonl: PathBuf,
    pub logs_dir: PathBuf,
    pub log_file: PathBuf,
    pub intermediate_dir: PathBuf,
    pub report_html: PathBuf,
    pub metrics_json: PathBuf,
}

impl RunPaths {
    pub fn resolve(cfg: &AppConfig, now: DateTime<Local>) -> Self {
        let timestamp = now.format("%Y%m%d_%H%M%S").to_string();

        let output_dir = cfg
            .output
            .dir
            .clone()
            .unwrap_or_else(|| cfg.output.root.join(format!("run_{timestamp}")));

        // The labelled evaluator merges its chunks into a fixed file name.
        let results_jsonl = match (cfg.evaluator.kind, &cfg.output.jsonl) {
            (EvaluatorKind::Analyzer, Some(p)) => p.clone(),
            _ => output_dir.join("results.jsonl"),
        };

        let logs_dir = output_dir.join("logs");
        let log_file = logs_dir.join(format!("run_{timestamp}.log"));

        Self {
            run_id: Uuid::new_v4().to_string(),
            intermediate_dir: output_dir.join("intermediate_images"),
            report_html: cfg
                .report
                .html
                .clone()
                .unwrap_or_else(|| output_dir.join("report.html")),
            metrics_json: output_dir.join("eval_report.json"),
            timestamp,
            output_dir,
            results_jsonl,
            logs_dir,
            log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn default_layout_is_timestamped() {
        let paths = RunPaths::resolve(&AppConfig::default(), at());
        assert_eq!(paths.output_dir, PathBuf::from("output/run_20250314_092653"));
        assert_eq!(
            paths.log_file,
            PathBuf::from("output/run_20250314_092653/logs/run_20250314_092653.log")
        );
        assert_eq!(
            paths.results_jsonl,
            PathBuf::from("output/run_20250314_092653/results.jsonl")
        );
        assert_eq!(
            paths.intermediate_dir,
            PathBuf::from("output/run_20250314_092653/intermediate_images")
        );
    }

    #[test]
    fn explicit_output_paths_win_for_analyzer() {
        let mut cfg = AppConfig::default();
        cfg.output.dir = Some(PathBuf::from("/tmp/run"));
        cfg.output.jsonl = Some(PathBuf::from("/tmp/elsewhere/out.jsonl"));
        let paths = RunPaths::resolve(&cfg, at());
        assert_eq!(paths.output_dir, PathBuf::from("/tmp/run"));
        assert_eq!(paths.results_jsonl, PathBuf::from("/tmp/elsewhere/out.jsonl"));
        assert_eq!(paths.report_html, PathBuf::from("/tmp/run/report.html"));
    }

    #[test]
    fn bbox_eval_always_reads_merged_results() {
        let mut cfg = AppConfig::default();
        cfg.evaluator.kind = EvaluatorKind::BboxEval;
        cfg.output.dir = Some(PathBuf::from("/tmp/run"));
        cfg.output.jsonl = Some(PathBuf::from("/tmp/ignored.jsonl"));
        let paths = RunPaths::resolve(&cfg, at());
        assert_eq!(paths.results_jsonl, PathBuf::from("/tmp/run/results.jsonl"));
        assert_eq!(paths.metrics_json, PathBuf::from("/tmp/run/eval_report.json"));
    }
}
