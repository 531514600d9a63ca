use crate::model::FetchError;
use serde_json::Value;

/// Source of raw per-asset listing records.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<Value>, FetchError>;
}
