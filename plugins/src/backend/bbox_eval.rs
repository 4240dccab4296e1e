use vlmrun_core::api as core_api;

use super::{python_log_level, python_script};

pub const BBOX_EVAL_SCRIPT: &str = "washer_knob_eval_bbox.py";

/// Labelled evaluation over a dataset root with `with_status` and
/// `without_status` subsets. The script merges its chunk files into
/// `<output_dir>/results.jsonl` and writes `eval_report.json` next to it.
pub struct BboxEvalEvaluator;

impl core_api::EvaluatorStrategy for BboxEvalEvaluator {
    fn name(&self) -> &str {
        "bbox_eval"
    }

    fn plan(&self, cfg: &core_api::AppConfig, paths: &core_api::RunPaths) -> core_api::ProcessSpec {
        tracing::debug!(
            script = BBOX_EVAL_SCRIPT,
            dataset_dir = %cfg.evaluator.image_dir.display(),
            subset = cfg.evaluator.subset.as_str(),
            "planning bbox evaluator"
        );

        let mut spec = python_script(cfg, BBOX_EVAL_SCRIPT)
            .flag("--dataset_dir", cfg.evaluator.image_dir.display())
            .flag("--question", &cfg.evaluator.question)
            .flag("--output_dir", paths.output_dir.display())
            .flag_if(
                cfg.evaluator.save_intermediate_images,
                "--save_intermediate_images",
            )
            .flag("--eas_url", &cfg.eas.url)
            .flag("--eas_token", &cfg.eas.token)
            .flag("--model_name", &cfg.eas.model_name)
            .flag("--max_tokens", cfg.processing.max_tokens)
            .flag("--timeout", cfg.processing.timeout_secs)
            .flag("--subset", cfg.evaluator.subset.as_str())
            .flag("--log_level", python_log_level(cfg));

        if let Some(n) = cfg.evaluator.max_samples {
            spec = spec.flag("--max_samples", n);
        }
        spec
    }
}
