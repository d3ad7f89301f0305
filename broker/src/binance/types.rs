//! Binance-specific API response types.

use serde::Deserialize;

/// Binance account balance entry.
#[derive(Debug, Deserialize)]
pub struct BalanceInfo {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

/// Binance account info response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub balances: Vec<BalanceInfo>,
    #[serde(default)]
    pub can_trade: bool,
}

/// Binance order response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub status: String,
    pub executed_qty: String,
    #[serde(default)]
    pub cummulative_quote_qty: String,
}

/// Binance last-price ticker response (GET /api/v3/ticker/price).
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}

/// Binance error body, e.g. `{"code":-2011,"msg":"Unknown order sent."}`.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: i64,
    pub msg: String,
}

impl ApiError {
    /// Code returned when cancelling an order the exchange no longer has open.
    pub const UNKNOWN_ORDER: i64 = -2011;
    /// Code returned when the request weight limit is exceeded.
    pub const TOO_MANY_REQUESTS: i64 = -1003;
}
