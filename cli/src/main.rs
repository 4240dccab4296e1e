use clap::Parser;

mod app;
mod commands;
mod logging;

use commands::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let exit = app::run_app(args).await?;
    std::process::exit(exit);
}
