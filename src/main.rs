mod analyzer;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod notifier;
mod utils;

use analyzer::{AlertEngine, AlertReport};
use chrono::{DateTime, Utc};
use config::{AppConfig, load_config};
use fetcher::{CoinMarketCapSource, MarketDataSource};
use model::AppError;
use normalizer::normalize_all;
use notifier::{DryRunNotifier, Notifier, SlackNotifier};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV: &str = "MARKET_PULSE_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Run failed, no report sent: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Wires the collaborators from config and performs one run.
async fn run(config: AppConfig) -> Result<(), AppError> {
    let source = CoinMarketCapSource::new(config.coinmarketcap.clone())?;
    let notifier: Box<dyn Notifier> = if config.dry_run {
        Box::new(DryRunNotifier)
    } else {
        Box::new(SlackNotifier::new(config.slack.clone())?)
    };
    let engine = AlertEngine::new(
        config.thresholds.clone(),
        config.timezone.offset()?,
        config.timezone.label.clone(),
    );

    run_once(
        &source,
        notifier.as_ref(),
        &engine,
        &config.coinmarketcap.convert,
        Utc::now(),
    )
    .await?;
    Ok(())
}

/// Fetch, normalize, analyze, deliver. Any failure before delivery means nothing is sent.
async fn run_once(
    source: &dyn MarketDataSource,
    notifier: &dyn Notifier,
    engine: &AlertEngine,
    convert: &str,
    now: DateTime<Utc>,
) -> Result<AlertReport, AppError> {
    info!("Fetching market snapshot...");
    let raw = source.fetch_listings().await?;

    info!("Normalizing {} records...", raw.len());
    let snapshot = normalize_all(&raw, convert)?;

    info!("Analyzing snapshot of {} assets...", snapshot.len());
    let report = engine.analyze(&snapshot, now)?;
    info!(
        "Report ready: {} volatility, {} volume, {} momentum alerts",
        report.volatility.alerts.len(),
        report.volume.alerts.len(),
        report.momentum.alerts.len()
    );

    notifier.deliver(&report.render()).await?;
    info!("Finished run.");
    Ok(report)
}
