use std::path::PathBuf;

use clap::Parser;

/// Runs a VLM batch evaluation and reports whether it succeeded.
///
/// Settings come from built-in defaults, then the config file, then the
/// launcher environment variables (IMAGE_DIR, QUESTION, OUTPUT_DIR,
/// OUTPUT_JSONL, NUM_PROCESSORS, BATCH_SIZE, MAX_TOKENS, TIMEOUT, LOG_LEVEL,
/// DEBUG, EAS_URL, EAS_TOKEN, MODEL_NAME, ...).
#[derive(Parser, Debug, Clone)]
#[command(name = "vlmrun", version)]
pub struct Args {
    /// TOML config file. Defaults to ./vlmrun.toml when present.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Print the effective configuration (token masked) and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}
