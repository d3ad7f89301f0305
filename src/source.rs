//! Capabilities the rebalance core consumes from its host.
//!
//! Each trait is a single blocking call from the core's point of view. A
//! failure aborts the current cycle; nothing here retries.

use crate::error::Result;
use crate::order::{Order, PlacedOrder};
use crate::types::Balances;

/// Market capitalization per currency, in USD.
pub trait MarketCapSource {
    fn market_cap_usd(&self, currency: &str) -> Result<f64>;
}

/// Last traded price of a trading pair, in the pair's quote currency.
pub trait PriceSource {
    fn last_price(&self, symbol: &str) -> Result<f64>;
}

/// Current account balances.
pub trait BalanceSource {
    fn balances(&self) -> Result<Balances>;
}

/// Accepts new orders and cancels previously placed ones.
pub trait OrderSink {
    /// Submit `orders` in sequence. Returns one handle per accepted order.
    fn submit_orders(&self, orders: &[Order]) -> Result<Vec<PlacedOrder>>;

    /// Cancel every order in `orders`.
    fn cancel_orders(&self, orders: &[PlacedOrder]) -> Result<()>;
}
