//! Glassnode REST API client.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::BrokerError;

/// One point of a Glassnode time series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DataPoint {
    /// Unix timestamp in seconds.
    pub t: i64,
    /// `null` for days Glassnode has no value for.
    pub v: Option<f64>,
}

/// Blocking Glassnode REST client.
pub struct GlassnodeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GlassnodeClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: "https://api.glassnode.com".to_string(),
        })
    }

    /// Point the client at another host (e.g. a local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Daily USD market cap of `asset` since `since_secs`
    /// (GET /v1/metrics/market/marketcap_usd).
    pub fn market_cap_usd(&self, asset: &str, since_secs: i64) -> Result<Vec<DataPoint>, BrokerError> {
        let url = format!("{}/v1/metrics/market/marketcap_usd", self.base_url);
        let since = since_secs.to_string();
        debug!("Glassnode market cap query for {asset} since {since_secs}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("a", asset),
                ("i", "24h"),
                ("s", since.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .map_err(|e| BrokerError::Connection(format!("market cap request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(match status.as_u16() {
                429 => BrokerError::RateLimit,
                401 | 403 => BrokerError::Auth(format!("market cap returned {status}")),
                _ => BrokerError::Connection(format!("market cap returned {status}: {body}")),
            });
        }

        let body = resp
            .text()
            .map_err(|e| BrokerError::Connection(format!("failed to read market cap body: {e}")))?;
        parse_series(&body)
    }
}

/// Parse a `[{"t": .., "v": ..}]` series.
pub fn parse_series(body: &str) -> Result<Vec<DataPoint>, BrokerError> {
    serde_json::from_str(body)
        .map_err(|e| BrokerError::Parse(format!("failed to parse market cap series: {e}")))
}

/// Value of the most recent point that has one.
pub fn latest_value(series: &[DataPoint]) -> Option<f64> {
    series
        .iter()
        .filter_map(|p| p.v.map(|v| (p.t, v)))
        .max_by_key(|(t, _)| *t)
        .map(|(_, v)| v)
}
