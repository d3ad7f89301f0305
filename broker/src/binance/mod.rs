//! Binance spot broker implementation.

pub mod auth;
pub mod client;
pub mod types;

use std::time::Duration;

use capweight::diff::{QUANTITY_DECIMALS, quantize_quantity};
use capweight::{
    Balance, BalanceSource, Balances, Order, OrderSink, PlacedOrder, PriceSource,
};
use log::{debug, info};

use crate::Broker;
use crate::error::BrokerError;
use client::{BinanceClient, CancelOutcome};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Binance spot broker.
///
/// Uses the REST API for all operations, blocking via `reqwest::blocking`.
/// Trading pairs are passed through as-is (`"BTCUSDT"`); the rebalance core
/// builds them from the configured base currency.
pub struct BinanceBroker {
    api_key: String,
    secret_key: String,
    testnet: bool,
    timeout: Duration,
    client: Option<BinanceClient>,
}

impl BinanceBroker {
    /// Create a new Binance broker handle (not yet connected).
    pub fn new(api_key: &str, secret_key: &str, testnet: bool) -> Self {
        Self {
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
            testnet,
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// Set the per-request timeout (default 10s). Takes effect on the next connect.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_testnet(&self) -> bool {
        self.testnet
    }

    fn require_client(&self) -> Result<&BinanceClient, BrokerError> {
        self.client.as_ref().ok_or(BrokerError::NotConnected)
    }

    fn submit_one(client: &BinanceClient, order: &Order) -> Result<PlacedOrder, BrokerError> {
        let (quantity, price) = order_params(order)?;
        let resp =
            client.submit_limit_order(&order.symbol, order.side.as_str(), &quantity, &price)?;
        debug!(
            "Binance accepted order {} on {} ({})",
            resp.order_id, resp.symbol, resp.status
        );
        Ok(PlacedOrder::from_order(resp.order_id, order))
    }

    fn cancel_one(client: &BinanceClient, order: &PlacedOrder) -> Result<(), BrokerError> {
        match client.cancel_order(&order.symbol, order.id)? {
            CancelOutcome::Cancelled => debug!("Cancelled {order}"),
            CancelOutcome::AlreadyClosed => info!("{order} already closed on Binance"),
        }
        Ok(())
    }
}

impl PriceSource for BinanceBroker {
    fn last_price(&self, symbol: &str) -> capweight::Result<f64> {
        let client = self.require_client().map_err(BrokerError::into_data_source)?;
        let ticker = client
            .ticker_price(symbol)
            .map_err(BrokerError::into_data_source)?;
        parse_decimal(&ticker.price, "price").map_err(BrokerError::into_data_source)
    }
}

impl BalanceSource for BinanceBroker {
    fn balances(&self) -> capweight::Result<Balances> {
        let client = self.require_client().map_err(BrokerError::into_data_source)?;
        let info = client.account_info().map_err(BrokerError::into_data_source)?;
        balances_from_account(&info).map_err(BrokerError::into_data_source)
    }
}

impl OrderSink for BinanceBroker {
    fn submit_orders(&self, orders: &[Order]) -> capweight::Result<Vec<PlacedOrder>> {
        let client = self.require_client().map_err(BrokerError::into_order_sink)?;
        crate::submit_batch(
            orders,
            |o| Self::submit_one(client, o),
            |p| Self::cancel_one(client, p),
        )
        .map_err(BrokerError::into_order_sink)
    }

    fn cancel_orders(&self, orders: &[PlacedOrder]) -> capweight::Result<()> {
        let client = self.require_client().map_err(BrokerError::into_order_sink)?;
        orders
            .iter()
            .try_for_each(|o| Self::cancel_one(client, o))
            .map_err(BrokerError::into_order_sink)
    }
}

impl Broker for BinanceBroker {
    fn name(&self) -> &'static str {
        "binance"
    }

    fn connect(&mut self) -> Result<(), BrokerError> {
        let client =
            BinanceClient::new(&self.api_key, &self.secret_key, self.testnet, self.timeout)?;
        client.ping()?;
        self.client = Some(client);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BrokerError> {
        self.client = None;
        Ok(())
    }
}

/// Convert an account response into balances, skipping empty entries.
pub fn balances_from_account(info: &types::AccountInfo) -> Result<Balances, BrokerError> {
    let mut balances = Balances::default();
    for b in &info.balances {
        let free = parse_decimal(&b.free, "free")?;
        let locked = parse_decimal(&b.locked, "locked")?;
        if free + locked <= 0.0 {
            continue;
        }
        balances.insert(b.asset.clone(), Balance::from_free_locked(free, locked));
    }
    Ok(balances)
}

/// Wire quantity and price for `order`.
///
/// The quantity is rounded down to the lot step, so the notional sent never
/// exceeds the one the order was sized for. A quantity below one step is
/// rejected rather than sent as zero.
pub fn order_params(order: &Order) -> Result<(String, String), BrokerError> {
    let quantity = quantize_quantity(order.quantity, order.price, 0.0);
    if quantity <= 0.0 {
        return Err(BrokerError::Order(format!(
            "{order}: quantity rounds to zero at {QUANTITY_DECIMALS} decimals"
        )));
    }
    Ok((format_decimal(quantity), format_decimal(order.price)))
}

/// Format a quantity or price for the order endpoint: up to 8 decimals,
/// trailing zeros trimmed.
pub fn format_decimal(value: f64) -> String {
    let s = format!("{value:.8}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn parse_decimal(s: &str, field: &str) -> Result<f64, BrokerError> {
    s.parse::<f64>()
        .map_err(|e| BrokerError::Parse(format!("{field} {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use capweight::Side;

    #[test]
    fn decimal_formatting() {
        assert_eq!(format_decimal(0.5), "0.5");
        assert_eq!(format_decimal(40_000.0), "40000");
        assert_eq!(format_decimal(0.000_000_01), "0.00000001");
        assert_eq!(format_decimal(1.234_567_891), "1.23456789");
        assert_eq!(format_decimal(0.0), "0");
    }

    #[test]
    fn order_params_never_round_up() {
        let order = Order::limit("BTCUSDT", Side::Buy, 14.285_714_285_714_286, 7.0);
        let (quantity, price) = order_params(&order).unwrap();
        assert_eq!(quantity, "14.28571428");
        assert_eq!(price, "7");
        assert!(quantity.parse::<f64>().unwrap() * 7.0 <= 100.0);
    }

    #[test]
    fn order_params_reject_sub_step_quantity() {
        let order = Order::limit("BTCUSDT", Side::Buy, 1e-14, 50_000.0);
        assert!(matches!(order_params(&order), Err(BrokerError::Order(_))));
    }

    #[test]
    fn not_connected() {
        let broker = BinanceBroker::new("k", "s", true);
        assert!(matches!(
            broker.last_price("BTCUSDT"),
            Err(capweight::Error::DataSource(_))
        ));
        assert!(matches!(
            broker.cancel_orders(&[]),
            Err(capweight::Error::OrderSink(_))
        ));
    }
}
