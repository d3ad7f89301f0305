//! Glassnode market-cap source.

pub mod client;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use capweight::MarketCapSource;

use crate::error::BrokerError;
use client::{GlassnodeClient, latest_value};

/// Default look-back window for the market-cap series.
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Market caps from Glassnode: the latest daily value inside the look-back window.
pub struct GlassnodeSource {
    client: GlassnodeClient,
    lookback: Duration,
}

impl GlassnodeSource {
    pub fn new(client: GlassnodeClient) -> Self {
        Self {
            client,
            lookback: DEFAULT_LOOKBACK,
        }
    }

    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    fn since_secs(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        now.saturating_sub(self.lookback).as_secs() as i64
    }
}

impl MarketCapSource for GlassnodeSource {
    fn market_cap_usd(&self, currency: &str) -> capweight::Result<f64> {
        let series = self
            .client
            .market_cap_usd(currency, self.since_secs())
            .map_err(BrokerError::into_data_source)?;
        latest_value(&series).ok_or_else(|| {
            capweight::Error::DataSource(format!("no market cap data for {currency}"))
        })
    }
}
