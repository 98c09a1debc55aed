use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod bootstrap;

#[derive(Parser)]
#[command(
    name = "hearsay",
    version,
    about = "Terminal client for the fake-news detector API"
)]
struct Cli {
    /// Config file; `./hearsay.yaml` is picked up automatically when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = bootstrap::load_config(cli.config.as_deref())?;
    bootstrap::init_logging_from(&cfg)?;

    bootstrap::run(cfg).await
}
