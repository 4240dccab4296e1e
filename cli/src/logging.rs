use std::path::Path;

use anyhow::Context;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use vlmrun_core::api::{LoggingConfig, CHILD_TARGET};

/// Installs the console and run-log sinks.
pub fn init(cfg: &LoggingConfig, log_file: &Path) -> anyhow::Result<()> {
    let dir = log_file
        .parent()
        .context("log file has no parent directory")?;
    let file_name = log_file
        .file_name()
        .context("log file has no file name")?;
    let appender = tracing_appender::rolling::never(dir, file_name);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(cfg, rust_log.as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(appender))
        .try_init()
        .context("logger already initialized")?;
    Ok(())
}

/// `RUST_LOG` overrides the configured level for the driver's own events.
/// Evaluator output is admitted at `info` whatever the base filter says, since
/// the outcome is decided from those lines.
pub(crate) fn build_filter(cfg: &LoggingConfig, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
    let base = rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| {
            EnvFilter::try_new(cfg.filter_directive()).unwrap_or_else(|_| EnvFilter::new("info"))
        });
    let child: Directive = format!("{CHILD_TARGET}=info")
        .parse()
        .context("invalid child log directive")?;
    Ok(base.add_directive(child))
}
