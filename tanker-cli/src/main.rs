//! tanker - batched reference resolution for JSON records
//!
//! Logs go to stderr; stdout carries only the resulting JSON document.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use tanker_cli::{log_level, run, Args};
use tanker_common::config::TomlConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing starts before the config is read so config loading is logged;
    // the config's log level is applied afterwards through the reload handle
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let initial = env_filter
        .unwrap_or_else(|| EnvFilter::new(log_level(args.log_level.as_deref(), None)));
    let (filter, reload_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if !from_env && args.log_level.is_none() && config.log_level.is_some() {
        let level = log_level(None, config.log_level.as_deref());
        reload_handle
            .reload(EnvFilter::new(level))
            .context("Failed to apply configured log level")?;
    }

    info!("Starting tanker v{}", env!("CARGO_PKG_VERSION"));

    let output = match run(&args, &config).await {
        Ok(output) => output,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
