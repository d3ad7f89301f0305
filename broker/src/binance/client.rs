//! Binance REST API client.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::debug;
use reqwest::blocking::{Client, Response};

use super::auth::Signer;
use super::types::{AccountInfo, ApiError, OrderResponse, TickerPrice};
use crate::error::BrokerError;

/// Blocking Binance REST client.
pub struct BinanceClient {
    client: Client,
    api_key: String,
    signer: Signer,
    base_url: String,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// The exchange no longer knows the order (already filled or cancelled).
    AlreadyClosed,
}

impl BinanceClient {
    /// Create a new Binance client with a per-request timeout.
    pub fn new(
        api_key: &str,
        secret_key: &str,
        testnet: bool,
        timeout: Duration,
    ) -> Result<Self, BrokerError> {
        let base_url = if testnet {
            "https://testnet.binance.vision"
        } else {
            "https://api.binance.com"
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            signer: Signer::new(secret_key)?,
            base_url: base_url.to_string(),
        })
    }

    /// Test connectivity (GET /api/v3/ping).
    pub fn ping(&self) -> Result<(), BrokerError> {
        let url = format!("{}/api/v3/ping", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BrokerError::Connection(format!("ping failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(BrokerError::Connection(format!(
                "ping returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    /// Get account information (GET /api/v3/account).
    pub fn account_info(&self) -> Result<AccountInfo, BrokerError> {
        let query = format!("timestamp={}", current_timestamp_ms());
        let url = format!("{}/api/v3/account?{}", self.base_url, self.signed(&query));

        let resp = self
            .client
            .get(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .map_err(|e| BrokerError::Connection(format!("account request failed: {e}")))?;

        let resp = check_status(resp, "account", BrokerError::Connection)?;
        resp.json::<AccountInfo>()
            .map_err(|e| BrokerError::Parse(format!("failed to parse account: {e}")))
    }

    /// Last traded price (GET /api/v3/ticker/price).
    pub fn ticker_price(&self, symbol: &str) -> Result<TickerPrice, BrokerError> {
        let url = format!("{}/api/v3/ticker/price?symbol={symbol}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BrokerError::Connection(format!("ticker request failed: {e}")))?;

        let resp = check_status(resp, "ticker", BrokerError::Connection)?;
        resp.json::<TickerPrice>()
            .map_err(|e| BrokerError::Parse(format!("failed to parse ticker: {e}")))
    }

    /// Submit a GTC limit order (POST /api/v3/order).
    pub fn submit_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
    ) -> Result<OrderResponse, BrokerError> {
        let query = format!(
            "symbol={symbol}&side={side}&type=LIMIT&timeInForce=GTC&quantity={quantity}&price={price}&timestamp={}",
            current_timestamp_ms()
        );
        let url = format!("{}/api/v3/order", self.base_url);

        debug!("Submitting Binance order: {query}");

        let resp = self
            .client
            .post(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(self.signed(&query))
            .send()
            .map_err(|e| BrokerError::Order(format!("order request failed: {e}")))?;

        let resp = check_status(resp, "order", BrokerError::Order)?;
        resp.json::<OrderResponse>()
            .map_err(|e| BrokerError::Parse(format!("failed to parse order response: {e}")))
    }

    /// Cancel an order (DELETE /api/v3/order).
    ///
    /// An order that is already filled or cancelled is reported as
    /// [`CancelOutcome::AlreadyClosed`] rather than an error.
    pub fn cancel_order(&self, symbol: &str, order_id: u64) -> Result<CancelOutcome, BrokerError> {
        let query = format!(
            "symbol={symbol}&orderId={order_id}&timestamp={}",
            current_timestamp_ms()
        );
        let url = format!("{}/api/v3/order?{}", self.base_url, self.signed(&query));

        debug!("Cancelling Binance order {order_id} on {symbol}");

        let resp = self
            .client
            .delete(&url)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .map_err(|e| BrokerError::Order(format!("cancel request failed: {e}")))?;

        if resp.status().is_success() {
            return Ok(CancelOutcome::Cancelled);
        }

        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        match parse_api_error(&body) {
            Some(err) if err.code == ApiError::UNKNOWN_ORDER => Ok(CancelOutcome::AlreadyClosed),
            _ => Err(BrokerError::Order(format!("cancel returned {status}: {body}"))),
        }
    }

    fn signed(&self, query: &str) -> String {
        self.signer.sign_query(query)
    }
}

/// Parse a Binance error body, if it is one.
pub fn parse_api_error(body: &str) -> Option<ApiError> {
    serde_json::from_str(body).ok()
}

/// Turn a non-success response into an error, classifying rate limits and auth failures.
fn check_status(
    resp: Response,
    what: &str,
    fallback: fn(String) -> BrokerError,
) -> Result<Response, BrokerError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    match status.as_u16() {
        429 | 418 => Err(BrokerError::RateLimit),
        401 => Err(BrokerError::Auth(format!("{what} returned {status}: {body}"))),
        _ => match parse_api_error(&body) {
            Some(err) if err.code == ApiError::TOO_MANY_REQUESTS => Err(BrokerError::RateLimit),
            _ => Err(fallback(format!("{what} returned {status}: {body}"))),
        },
    }
}

/// Current timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}
