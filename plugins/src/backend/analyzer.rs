use vlmrun_core::api as core_api;

use super::{python_log_level, python_script};

pub const ANALYZER_SCRIPT: &str = "washer_knob_analyzer.py";

/// Batch analysis over an unlabelled image directory.
pub struct AnalyzerEvaluator;

impl core_api::EvaluatorStrategy for AnalyzerEvaluator {
    fn name(&self) -> &str {
        "analyzer"
    }

    fn plan(&self, cfg: &core_api::AppConfig, paths: &core_api::RunPaths) -> core_api::ProcessSpec {
        tracing::debug!(
            script = ANALYZER_SCRIPT,
            image_dir = %cfg.evaluator.image_dir.display(),
            "planning analyzer evaluator"
        );

        python_script(cfg, ANALYZER_SCRIPT)
            .flag("--image_dir", cfg.evaluator.image_dir.display())
            .flag("--question", &cfg.evaluator.question)
            .flag("--output_dir", paths.output_dir.display())
            .flag("--output_jsonl", paths.results_jsonl.display())
            .flag(
                "--save_intermediate_images",
                cfg.evaluator.save_intermediate_images,
            )
            .flag("--eas_url", &cfg.eas.url)
            .flag("--eas_token", &cfg.eas.token)
            .flag("--model_name", &cfg.eas.model_name)
            .flag("--num_processors", cfg.processing.num_processors)
            .flag("--batch_size", cfg.processing.batch_size)
            .flag("--max_tokens", cfg.processing.max_tokens)
            .flag("--timeout", cfg.processing.timeout_secs)
            .flag("--log_level", python_log_level(cfg))
            .flag_if(cfg.logging.debug, "--debug")
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use vlmrun_core::api::{AppConfig, EvaluatorStrategy};

    use super::*;
    use crate::test_support::fixed_paths;

    #[test]
    fn plans_every_flag_in_order() {
        let mut cfg = AppConfig::default();
        cfg.evaluator.image_dir = PathBuf::from("/data/knobs");
        cfg.evaluator.question = "Which mode?".into();
        cfg.eas.token = "sk-test".into();
        let paths = fixed_paths("/out/run_1");

        let spec = AnalyzerEvaluator.plan(&cfg, &paths);
        assert_eq!(spec.program, "python3");
        assert_eq!(
            spec.args,
            vec![
                "scripts/washer_knob_analyzer.py",
                "--image_dir",
                "/data/knobs",
                "--question",
                "Which mode?",
                "--output_dir",
                "/out/run_1",
                "--output_jsonl",
                "/out/run_1/results.jsonl",
                "--save_intermediate_images",
                "true",
                "--eas_url",
                "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation",
                "--eas_token",
                "sk-test",
                "--model_name",
                "Qwen3-VL-235B-A22B-Instruct-FP8",
                "--num_processors",
                "4",
                "--batch_size",
                "2",
                "--max_tokens",
                "512",
                "--timeout",
                "120",
                "--log_level",
                "INFO",
            ]
        );
        assert!(spec
            .envs
            .contains(&("PYTHONUNBUFFERED".to_string(), "1".to_string())));
    }

    #[test]
    fn debug_adds_flag_and_level() {
        let mut cfg = AppConfig::default();
        cfg.logging.debug = true;
        cfg.evaluator.save_intermediate_images = false;
        let spec = AnalyzerEvaluator.plan(&cfg, &fixed_paths("/out"));
        assert_eq!(spec.args.last().map(String::as_str), Some("--debug"));
        assert_eq!(spec.flag_value("--log_level"), Some("DEBUG"));
        assert_eq!(spec.flag_value("--save_intermediate_images"), Some("false"));
    }
}
