// Core structs: AssetRecord, Snapshot, EnrichedSnapshot and the error taxonomy
use std::collections::HashSet;
use thiserror::Error;

/// One row of a market snapshot, as normalized from the provider payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change_1h: Option<f64>,
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
}

/// A non-empty, symbol-unique table of assets taken at one retrieval instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    assets: Vec<AssetRecord>,
}

impl Snapshot {
    pub fn new(assets: Vec<AssetRecord>) -> Result<Self, SnapshotError> {
        if assets.is_empty() {
            return Err(SnapshotError::EmptySnapshot);
        }

        let mut seen = HashSet::new();
        for (index, asset) in assets.iter().enumerate() {
            if !seen.insert(asset.symbol.as_str()) {
                return Err(SnapshotError::MalformedRecord {
                    index,
                    reason: format!("duplicate symbol '{}'", asset.symbol),
                });
            }
        }

        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

/// Metrics computed from the snapshot rather than supplied by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub volume_to_market_cap: f64,
    pub volume_vs_avg: f64,
    /// Absent when the asset has no 24h change.
    pub relative_strength_score: Option<f64>,
    /// Absent when any of the 1h/24h/7d changes is missing.
    pub momentum_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedAsset {
    pub record: AssetRecord,
    pub metrics: DerivedMetrics,
}

/// Snapshot with derived columns attached. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct EnrichedSnapshot {
    assets: Vec<EnrichedAsset>,
    mean_volume_24h: f64,
    mean_change_24h: Option<f64>,
}

impl EnrichedSnapshot {
    pub(crate) fn new(
        assets: Vec<EnrichedAsset>,
        mean_volume_24h: f64,
        mean_change_24h: Option<f64>,
    ) -> Self {
        Self {
            assets,
            mean_volume_24h,
            mean_change_24h,
        }
    }

    pub fn assets(&self) -> &[EnrichedAsset] {
        &self.assets
    }

    pub fn mean_volume_24h(&self) -> f64 {
        self.mean_volume_24h
    }

    /// Mean over the assets that report a 24h change.
    pub fn mean_change_24h(&self) -> Option<f64> {
        self.mean_change_24h
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("snapshot contains no records")]
    EmptySnapshot,

    #[error("degenerate snapshot: {0}")]
    DegenerateSnapshot(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Rate limiting, server-side failures and transport errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Api { .. } | FetchError::InvalidResponse(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging API responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("messaging API rejected the message: {0}")]
    Rejected(String),
}

/// Everything that can abort a single run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("market data retrieval failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("report delivery failed: {0}")]
    Notify(#[from] NotifyError),
}

#[cfg(test)]
pub(crate) fn asset(
    symbol: &str,
    price: f64,
    changes: (Option<f64>, Option<f64>, Option<f64>),
    market_cap: f64,
    volume_24h: f64,
) -> AssetRecord {
    AssetRecord {
        name: format!("{} coin", symbol),
        symbol: symbol.to_string(),
        price,
        change_1h: changes.0,
        change_24h: changes.1,
        change_7d: changes.2,
        market_cap,
        volume_24h,
        circulating_supply: 1_000_000.0,
    }
}
