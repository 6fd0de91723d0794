//! Binary entrypoint for the geogif bot.
//!
//! One invocation is one pipeline run; the surrounding scheduler (cron,
//! systemd timer) decides the cadence and guarantees runs never overlap.
use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is a dev convenience; deployments set the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::load().context("loading GEOGIF_* environment")?;
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;

    let collaborators = config.collaborators();
    let pipeline_config = config.pipeline_config();

    match geogif_stages::run_once(&collaborators, &pipeline_config).await {
        Ok(report) => {
            let receipt = report.receipt.map(|r| r.id).unwrap_or_default();
            info!(run_id = %report.run_id, receipt = %receipt, "run finished");
            Ok(())
        }
        Err(err) => {
            error!(kind = err.kind(), error = %err, "run failed");
            std::process::exit(1);
        }
    }
}
