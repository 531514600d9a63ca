use crate::config::CoinMarketCapConfig;
use crate::fetcher::traits::MarketDataSource;
use crate::model::FetchError;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const LISTINGS_PATH: &str = "/v1/cryptocurrency/listings/latest";
const BASE_BACKOFF_MS: u64 = 500;
const MAX_JITTER_MS: u64 = 250;

pub struct CoinMarketCapSource {
    client: Client,
    config: CoinMarketCapConfig,
}

impl CoinMarketCapSource {
    pub fn new(config: CoinMarketCapConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("market-pulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    fn listings_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), LISTINGS_PATH)
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("start", "1".to_string()),
            ("limit", self.config.listing_limit.to_string()),
            ("convert", self.config.convert.clone()),
        ]
    }

    async fn fetch_once(&self) -> Result<Vec<Value>, FetchError> {
        let response = self
            .client
            .get(self.listings_url())
            .query(&self.query())
            .header("Accepts", "application/json")
            .header("X-CMC_PRO_API_KEY", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        parse_listings(body)
    }
}

#[async_trait::async_trait]
impl MarketDataSource for CoinMarketCapSource {
    async fn fetch_listings(&self) -> Result<Vec<Value>, FetchError> {
        let listings = retry_with_backoff(self.config.max_retries, || self.fetch_once()).await?;
        info!("📥 Fetched {} listings from CoinMarketCap", listings.len());
        Ok(listings)
    }
}

/// Runs `attempt` until it succeeds, fails with a non-retryable error, or
/// `max_retries` retries have been spent (at most `max_retries + 1` calls).
pub(crate) async fn retry_with_backoff<T, F, Fut>(max_retries: u32, mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && retries < max_retries => {
                let delay = backoff(retries);
                retries += 1;
                warn!(
                    "⏳ CoinMarketCap request failed ({}), retry {}/{} in {:?}",
                    e, retries, max_retries, delay
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Exponential backoff with a little random jitter.
fn backoff(attempt: u32) -> Duration {
    let exp = BASE_BACKOFF_MS.saturating_mul(1u64 << attempt.min(6));
    let jitter = rand::rng().random_range(0..=MAX_JITTER_MS);
    Duration::from_millis(exp + jitter)
}

/// Extracts the `data` array from a listings response, surfacing API-level errors.
pub(crate) fn parse_listings(body: Value) -> Result<Vec<Value>, FetchError> {
    if let Some(status) = body.get("status") {
        let code = status.get("error_code").and_then(Value::as_i64).unwrap_or(0);
        if code != 0 {
            let message = status
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(FetchError::Api { code, message });
        }
    }

    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(listings)) => Ok(listings),
            Some(other) => Err(FetchError::InvalidResponse(format!("`data` is not an array: {}", other))),
            None => Err(FetchError::InvalidResponse("missing `data` field".into())),
        },
        other => Err(FetchError::InvalidResponse(format!("unexpected body: {}", other))),
    }
}
