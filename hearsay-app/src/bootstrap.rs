//! Wiring: config → logging → client → event loop.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use hearsay_client::DetectorClient;
use hearsay_common::observability::{LogConfig, LogFormat, init_logging};
use hearsay_config::{HearsayConfig, HearsayConfigLoader};
use hearsay_tui::App;

const DEFAULT_CONFIG_FILE: &str = "hearsay.yaml";

/// Load configuration. An explicit `--config` path is attached as-is (still
/// optional on disk, matching the loader's contract); otherwise the default
/// file is picked up only when it exists.
pub fn load_config(explicit: Option<&Path>) -> Result<HearsayConfig> {
    let mut loader = HearsayConfigLoader::new();
    match explicit {
        Some(path) => loader = loader.with_file(path),
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                loader = loader.with_file(DEFAULT_CONFIG_FILE);
            }
        }
    }
    Ok(loader.load()?)
}

pub fn init_logging_from(cfg: &HearsayConfig) -> Result<()> {
    let log_path = init_logging(LogConfig {
        log_dir: cfg.log.dir.clone().map(PathBuf::from),
        format: if cfg.log.json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;
    tracing::info!(log_path = %log_path.display(), "logging initialised");
    Ok(())
}

pub async fn run(cfg: HearsayConfig) -> Result<()> {
    tracing::info!(base_url = %cfg.api.base_url, "starting hearsay");

    let mut client = DetectorClient::new(&cfg.api.base_url)?;
    if let Some(secs) = cfg.api.timeout_secs {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    let app = App::new(client)?;
    app.run().await
}
