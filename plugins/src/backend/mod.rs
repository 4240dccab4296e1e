mod analyzer;
mod bbox_eval;

pub use analyzer::AnalyzerEvaluator;
pub use bbox_eval::BboxEvalEvaluator;

use vlmrun_core::api as core_api;

/// Level string handed to the Python logger; `DEBUG` wins when debugging.
pub(crate) fn python_log_level(cfg: &core_api::AppConfig) -> String {
    if cfg.logging.debug {
        "DEBUG".to_string()
    } else {
        cfg.logging.level.trim().to_ascii_uppercase()
    }
}

/// Interpreter plus script path, with output unbuffered so lines reach the
/// run log as they are produced.
pub(crate) fn python_script(cfg: &core_api::AppConfig, script: &str) -> core_api::ProcessSpec {
    core_api::ProcessSpec::new(cfg.evaluator.python.clone())
        .arg(cfg.evaluator.scripts_dir.join(script).to_string_lossy())
        .env("PYTHONUNBUFFERED", "1")
}
