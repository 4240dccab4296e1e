use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

use super::types::{AppConfig, EvaluatorKind, Subset};

pub const DEFAULT_CONFIG_FILE: &str = "vlmrun.toml";

/// Loads the config file (explicit path, else `vlmrun.toml` when present) and
/// layers the process environment on top. Call [`validate`] once logging is
/// up so its warnings land in the run log.
pub fn load_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let cfg = load_file(path)?;
    apply_env_overrides(cfg, |key| std::env::var(key).ok())
}

pub fn load_file(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.display().to_string()));
            }
            p.to_path_buf()
        }
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(AppConfig::default());
            }
            p
        }
    };

    let s = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Applies the launcher environment variables. Empty values are ignored so an
/// exported-but-blank variable keeps the configured default.
pub fn apply_env_overrides<F>(mut cfg: AppConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("EVALUATOR") {
        cfg.evaluator.kind = EvaluatorKind::parse(&v).ok_or_else(|| invalid("EVALUATOR", &v))?;
    }
    if let Some(v) = get("PYTHON") {
        cfg.evaluator.python = v;
    }
    if let Some(v) = get("SCRIPTS_DIR") {
        cfg.evaluator.scripts_dir = expand_path("SCRIPTS_DIR", &v)?;
    }
    if let Some(v) = get("IMAGE_DIR") {
        cfg.evaluator.image_dir = expand_path("IMAGE_DIR", &v)?;
    }
    if let Some(v) = get("QUESTION") {
        cfg.evaluator.question = v;
    }
    if let Some(v) = get("SAVE_INTERMEDIATE_IMAGES") {
        cfg.evaluator.save_intermediate_images = parse_bool("SAVE_INTERMEDIATE_IMAGES", &v)?;
    }
    if let Some(v) = get("SUBSET") {
        cfg.evaluator.subset = Subset::parse(&v).ok_or_else(|| invalid("SUBSET", &v))?;
    }
    if let Some(v) = get("MAX_SAMPLES") {
        cfg.evaluator.max_samples = Some(parse_num("MAX_SAMPLES", &v)?);
    }

    if let Some(v) = get("OUTPUT_DIR") {
        cfg.output.dir = Some(expand_path("OUTPUT_DIR", &v)?);
    }
    if let Some(v) = get("OUTPUT_JSONL") {
        cfg.output.jsonl = Some(expand_path("OUTPUT_JSONL", &v)?);
    }

    if let Some(v) = get("NUM_PROCESSORS") {
        cfg.processing.num_processors = parse_num("NUM_PROCESSORS", &v)?;
    }
    if let Some(v) = get("BATCH_SIZE") {
        cfg.processing.batch_size = parse_num("BATCH_SIZE", &v)?;
    }
    if let Some(v) = get("MAX_TOKENS") {
        cfg.processing.max_tokens = parse_num("MAX_TOKENS", &v)?;
    }
    if let Some(v) = get("TIMEOUT") {
        cfg.processing.timeout_secs = parse_num("TIMEOUT", &v)?;
    }

    if let Some(v) = get("EAS_URL") {
        cfg.eas.url = v;
    }
    if let Some(v) = get("EAS_TOKEN") {
        cfg.eas.token = v;
    }
    if let Some(v) = get("MODEL_NAME") {
        cfg.eas.model_name = v;
    }

    if let Some(v) = get("LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = get("DEBUG") {
        cfg.logging.debug = parse_bool("DEBUG", &v)?;
    }

    if let Some(v) = get("GENERATE_REPORT") {
        cfg.report.enabled = parse_bool("GENERATE_REPORT", &v)?;
    }
    if let Some(v) = get("REPORT_HTML") {
        cfg.report.html = Some(expand_path("REPORT_HTML", &v)?);
    }
    if let Some(v) = get("REQUIREMENTS_FILE") {
        cfg.setup.requirements = Some(expand_path("REQUIREMENTS_FILE", &v)?);
    }

    Ok(cfg)
}

/// Clamps counters that must be positive and warns about values the
/// evaluator would reject at runtime.
pub fn validate(mut cfg: AppConfig) -> Result<AppConfig, ConfigError> {
    if cfg.eas.token.trim().is_empty() {
        tracing::warn!("EAS token is empty; requests to the endpoint will likely be rejected");
    }
    if cfg.processing.num_processors < 1 {
        tracing::warn!("num_processors must be at least 1, using 1");
        cfg.processing.num_processors = 1;
    }
    if cfg.processing.batch_size < 1 {
        tracing::warn!("batch_size must be at least 1, using 1");
        cfg.processing.batch_size = 1;
    }
    if cfg.processing.max_tokens == 0 {
        return Err(ConfigError::Validation("max_tokens must be positive".into()));
    }
    if cfg.processing.timeout_secs == 0 {
        return Err(ConfigError::Validation("timeout must be positive".into()));
    }
    if cfg.evaluator.question.trim().is_empty() {
        return Err(ConfigError::Validation("question must not be empty".into()));
    }
    Ok(cfg)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::EnvInvalid {
        key: key.to_string(),
        source: anyhow::anyhow!("unsupported value '{value}'"),
    }
}

fn parse_num<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::EnvInvalid {
            key: key.to_string(),
            source: anyhow::Error::new(e),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn expand_path(key: &str, value: &str) -> Result<PathBuf, ConfigError> {
    shellexpand::full(value)
        .map(|s| PathBuf::from(s.as_ref()))
        .map_err(|e| ConfigError::EnvInvalid {
            key: key.to_string(),
            source: anyhow::Error::new(e),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn env_overrides_replace_defaults() {
        let cfg = apply_env_overrides(
            AppConfig::default(),
            env(&[
                ("IMAGE_DIR", "/data/knobs"),
                ("QUESTION", "Which mode?"),
                ("NUM_PROCESSORS", "8"),
                ("BATCH_SIZE", "4"),
                ("MAX_TOKENS", "1024"),
                ("TIMEOUT", "60"),
                ("EAS_URL", "http://eas.local/api"),
                ("EAS_TOKEN", "secret"),
                ("MODEL_NAME", "qwen-vl"),
                ("LOG_LEVEL", "DEBUG"),
                ("DEBUG", "true"),
                ("EVALUATOR", "bbox_eval"),
                ("SUBSET", "with_status"),
                ("MAX_SAMPLES", "10"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.evaluator.image_dir, PathBuf::from("/data/knobs"));
        assert_eq!(cfg.evaluator.question, "Which mode?");
        assert_eq!(cfg.processing.num_processors, 8);
        assert_eq!(cfg.processing.batch_size, 4);
        assert_eq!(cfg.processing.max_tokens, 1024);
        assert_eq!(cfg.processing.timeout_secs, 60);
        assert_eq!(cfg.eas.url, "http://eas.local/api");
        assert_eq!(cfg.eas.token, "secret");
        assert_eq!(cfg.eas.model_name, "qwen-vl");
        assert_eq!(cfg.logging.level, "DEBUG");
        assert!(cfg.logging.debug);
        assert_eq!(cfg.evaluator.kind, EvaluatorKind::BboxEval);
        assert_eq!(cfg.evaluator.subset, Subset::WithStatus);
        assert_eq!(cfg.evaluator.max_samples, Some(10));
    }

    #[test]
    fn blank_env_values_keep_defaults() {
        let cfg = apply_env_overrides(
            AppConfig::default(),
            env(&[("NUM_PROCESSORS", "  "), ("EAS_URL", "")]),
        )
        .unwrap();
        assert_eq!(cfg.processing.num_processors, 4);
        assert_eq!(cfg.eas.url, AppConfig::default().eas.url);
    }

    #[test]
    fn non_numeric_env_is_rejected() {
        let err = apply_env_overrides(AppConfig::default(), env(&[("BATCH_SIZE", "two")]))
            .unwrap_err();
        match err {
            ConfigError::EnvInvalid { key, .. } => assert_eq!(key, "BATCH_SIZE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_evaluator_is_rejected() {
        let err = apply_env_overrides(AppConfig::default(), env(&[("EVALUATOR", "nope")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvInvalid { .. }));
    }

    #[test]
    fn env_beats_file_values() {
        let file = r#"
[processing]
num_processors = 2
timeout_secs = 30

[eas]
model_name = "from-file"
"#;
        let cfg: AppConfig = toml::from_str(file).unwrap();
        assert_eq!(cfg.processing.num_processors, 2);
        assert_eq!(cfg.processing.batch_size, 2);

        let cfg = apply_env_overrides(cfg, env(&[("MODEL_NAME", "from-env")])).unwrap();
        assert_eq!(cfg.eas.model_name, "from-env");
        assert_eq!(cfg.processing.timeout_secs, 30);
    }

    #[test]
    fn validate_clamps_zero_counters() {
        let mut cfg = AppConfig::default();
        cfg.processing.num_processors = 0;
        cfg.processing.batch_size = 0;
        let cfg = validate(cfg).unwrap();
        assert_eq!(cfg.processing.num_processors, 1);
        assert_eq!(cfg.processing.batch_size, 1);
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = AppConfig::default();
        cfg.processing.timeout_secs = 0;
        assert!(matches!(validate(cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = load_file(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[processing\nnum_processors = ").unwrap();
        let err = load_file(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn log_level_maps_python_names() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "WARNING".into();
        assert_eq!(cfg.logging.filter_directive(), "warn");
        cfg.logging.level = "verbose".into();
        assert_eq!(cfg.logging.filter_directive(), "info");
        cfg.logging.debug = true;
        assert_eq!(cfg.logging.filter_directive(), "debug");
    }
}
