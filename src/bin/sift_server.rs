//! Search server binary.
//!
//! Loads the config from `SIFT_CONFIG`, or the default config path when that
//! file exists, applies API key overrides from the environment and serves
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use sift::config::CONFIG_PATH_ENV;
use sift::{RequestCoordinator, SiftConfig, SiftServer};

fn load_config() -> anyhow::Result<SiftConfig> {
    let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            SiftConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => {
            let path = SiftConfig::default_config_path();
            if path.exists() {
                SiftConfig::from_file(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?
            } else {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                SiftConfig::default()
            }
        }
    };
    config.apply_env_overrides();
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("sift-server starting");

    let config = load_config()?;
    let coordinator = RequestCoordinator::from_config(&config).map_err(|e| {
        tracing::error!(error = %e, "sift-server failed to initialise");
        anyhow::anyhow!("sift-server failed: {e}")
    })?;

    let server = SiftServer::start(Arc::new(coordinator), &config.server).await?;
    tracing::info!(addr = %server.addr(), "sift-server ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    server.shutdown();
    tracing::info!("sift-server shut down cleanly");
    Ok(())
}
