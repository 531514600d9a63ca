use chrono::FixedOffset;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Upper bound for `listing_limit`.
pub const MAX_LISTING_LIMIT: u32 = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoinMarketCapConfig {
    pub api_key: String,
    pub base_url: String,
    pub listing_limit: u32,
    pub convert: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for CoinMarketCapConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://pro-api.coinmarketcap.com".to_string(),
            listing_limit: 100,
            convert: "USD".to_string(),
            timeout_seconds: 15,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub token: String,
    pub channel: String,
    pub api_url: String,
    pub timeout_seconds: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            channel: "#real-time-crypto-analytics".to_string(),
            api_url: "https://slack.com/api".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Alerting thresholds consumed by the section generators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// 1h move (in %) that counts as volatile; the 24h bar is three times this.
    pub volatility: f64,
    /// Volume-to-market-cap ratio above which volume is unusual.
    pub volume_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            volatility: 3.0,
            volume_ratio: 2.0,
        }
    }
}

/// Fixed zone used for the report header. Defaults to West Africa Time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    pub utc_offset_hours: i32,
    pub label: String,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 1,
            label: "WAT".to_string(),
        }
    }
}

impl TimezoneConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "timezone offset {}h is out of range",
                    self.utc_offset_hours
                ))
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub coinmarketcap: CoinMarketCapConfig,
    pub slack: SlackConfig,
    pub thresholds: Thresholds,
    pub timezone: TimezoneConfig,
    /// Log the report instead of posting it.
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Secrets from the environment take precedence over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("CMC_API_KEY").filter(|v| !v.is_empty()) {
            self.coinmarketcap.api_key = key;
        }
        if let Some(token) = lookup("SLACK_TOKEN").filter(|v| !v.is_empty()) {
            self.slack.token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coinmarketcap.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("coinmarketcap.api_key is empty".into()));
        }
        if !self.dry_run && self.slack.token.trim().is_empty() {
            return Err(ConfigError::Invalid("slack.token is empty".into()));
        }
        if !self.dry_run && self.slack.channel.trim().is_empty() {
            return Err(ConfigError::Invalid("slack.channel is empty".into()));
        }
        if !(1..=MAX_LISTING_LIMIT).contains(&self.coinmarketcap.listing_limit) {
            return Err(ConfigError::Invalid(format!(
                "coinmarketcap.listing_limit must be within 1..={} (deeper listings repeat tickers, \
                 and a repeated symbol aborts the snapshot), got {}",
                MAX_LISTING_LIMIT, self.coinmarketcap.listing_limit
            )));
        }
        if self.coinmarketcap.convert.trim().is_empty() {
            return Err(ConfigError::Invalid("coinmarketcap.convert is empty".into()));
        }
        if !(self.thresholds.volatility.is_finite() && self.thresholds.volatility > 0.0) {
            return Err(ConfigError::Invalid("thresholds.volatility must be positive".into()));
        }
        if !(self.thresholds.volume_ratio.is_finite() && self.thresholds.volume_ratio > 0.0) {
            return Err(ConfigError::Invalid("thresholds.volume_ratio must be positive".into()));
        }
        if self.timezone.utc_offset_hours.abs() > 23 {
            return Err(ConfigError::Invalid(format!(
                "timezone.utc_offset_hours must be within ±23, got {}",
                self.timezone.utc_offset_hours
            )));
        }
        Ok(())
    }
}

/// Loads the config file, applies environment secrets and validates the result.
///
/// Without an explicit path a missing `config.json` means defaults; an explicitly
/// named file must exist.
pub fn load_config(explicit_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut config = read_config_file(explicit_path)?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}

fn read_config_file(explicit_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let path = explicit_path.unwrap_or(DEFAULT_CONFIG_PATH);
    if explicit_path.is_none() && !Path::new(path).exists() {
        info!("Config file {} not found, using defaults and environment", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
