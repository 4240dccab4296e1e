use std::path::Path;

use chrono::Local;
use vlmrun_core::api as core_api;
use vlmrun_plugins::factory;

use crate::commands::cli::Args;
use crate::logging;

pub async fn run_app(args: Args) -> anyhow::Result<i32> {
    let cfg = match core_api::load_default(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let diagnosis = format!("configuration error: {}", chain(e));
            return Ok(fatal(&diagnosis, None, core_api::EXIT_FAILURE));
        }
    };

    if args.print_config {
        println!("{}", toml::to_string_pretty(&masked(&cfg))?);
        return Ok(core_api::EXIT_OK);
    }

    let paths = core_api::RunPaths::resolve(&cfg, Local::now());
    if let Err(e) = std::fs::create_dir_all(&paths.logs_dir) {
        let diagnosis = format!(
            "cannot create log directory {}: {e}",
            paths.logs_dir.display()
        );
        return Ok(fatal(&diagnosis, None, core_api::EXIT_FAILURE));
    }
    logging::init(&cfg.logging, &paths.log_file)?;

    let cfg = match core_api::validate(cfg) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Ok(fatal(&chain(e), Some(paths.log_file.as_path()), core_api::EXIT_FAILURE));
        }
    };

    let evaluator = factory::build_evaluator(cfg.evaluator.kind);
    let report = factory::build_report(cfg.evaluator.kind);
    let runner = core_api::TokioProcessRunner;
    let signals = core_api::SignalSet::default();

    let result = core_api::run_pipeline(core_api::PipelineArgs {
        cfg: &cfg,
        paths: &paths,
        evaluator: evaluator.as_ref(),
        report: Some(report.as_ref()),
        runner: &runner,
        signals: &signals,
    })
    .await;

    match result {
        Ok(outcome) => Ok(finish(&outcome, &paths)),
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            let code = e.exit_code();
            Ok(fatal(&chain(e), Some(paths.log_file.as_path()), code))
        }
    }
}

fn finish(outcome: &core_api::OutcomeRecord, paths: &core_api::RunPaths) -> i32 {
    match outcome.status {
        core_api::OutcomeStatus::Success => {
            println!("✓ {} ({} successful)", outcome.message, outcome.success_count);
            println!("  results: {}", paths.results_jsonl.display());
            println!("  log:     {}", paths.log_file.display());
        }
        core_api::OutcomeStatus::PartialSuccess => {
            println!("⚠ {}", outcome.message);
            println!("  results: {}", paths.results_jsonl.display());
            println!("  log:     {}", paths.log_file.display());
        }
        core_api::OutcomeStatus::Failure => {
            return fatal(&outcome.message, Some(paths.log_file.as_path()), outcome.exit_code);
        }
    }
    outcome.exit_code
}

fn fatal(diagnosis: &str, log_file: Option<&Path>, code: i32) -> i32 {
    println!("✗ {diagnosis}");
    println!("  {}", log_hint(log_file));
    code
}

/// Failures before logging is up have no run log to point at.
fn log_hint(log_file: Option<&Path>) -> String {
    match log_file {
        Some(path) => format!("see log: {}", path.display()),
        None => "no run log was written".to_string(),
    }
}

/// Error message followed by its source chain, `outer: inner: ...`.
fn chain(e: impl Into<anyhow::Error>) -> String {
    format!("{:#}", e.into())
}

fn masked(cfg: &core_api::AppConfig) -> core_api::AppConfig {
    let mut cfg = cfg.clone();
    if !cfg.eas.token.is_empty() {
        cfg.eas.token = "****".to_string();
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_hides_token_only_when_set() {
        let mut cfg = core_api::AppConfig::default();
        assert_eq!(masked(&cfg).eas.token, "");
        cfg.eas.token = "sk-live".into();
        let shown = masked(&cfg);
        assert_eq!(shown.eas.token, "****");
        assert_eq!(shown.eas.model_name, cfg.eas.model_name);
    }

    #[test]
    fn chain_includes_sources() {
        let err = core_api::ConfigError::EnvInvalid {
            key: "TIMEOUT".into(),
            source: anyhow::anyhow!("invalid digit found in string"),
        };
        assert_eq!(chain(err), "env var invalid: TIMEOUT: invalid digit found in string");
    }

    #[test]
    fn fatal_names_the_log_or_says_there_is_none() {
        let log = Path::new("output/run_1/logs/run_1.log");
        assert_eq!(log_hint(Some(log)), "see log: output/run_1/logs/run_1.log");
        assert_eq!(log_hint(None), "no run log was written");
        assert_eq!(fatal("configuration error: x", None, 1), 1);
    }

    #[tokio::test]
    async fn missing_config_file_fails_without_a_log() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            config: Some(dir.path().join("absent.toml")),
            print_config: false,
        };
        assert_eq!(run_app(args).await.unwrap(), core_api::EXIT_FAILURE);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failure_outcome_returns_its_code() {
        let paths = core_api::RunPaths::resolve(&core_api::AppConfig::default(), Local::now());
        let outcome = core_api::OutcomeRecord {
            status: core_api::OutcomeStatus::Failure,
            success_count: 0,
            exit_code: 9,
            message: "evaluator exited with code 9".into(),
        };
        assert_eq!(finish(&outcome, &paths), 9);
    }
}
