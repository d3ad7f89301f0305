//! Mock broker and market-cap source for testing.
//!
//! Use these in integration tests to drive full rebalance cycles without
//! network calls.
//!
//! ```ignore
//! use capweight_broker::mock::{MockBroker, MockMarketCaps, FillMode};
//!
//! let broker = MockBroker::builder()
//!     .fill_mode(FillMode::Accept)
//!     .with_price("BTCUSDT", 40_000.0)
//!     .with_balance("BTC", 0.5, 0.5)
//!     .with_balance("USDT", 10_000.0, 10_000.0)
//!     .build();
//! let caps = MockMarketCaps::new().with_cap("BTC", 800e9);
//! ```

use std::sync::Mutex;

use capweight::{
    Balance, BalanceSource, Balances, MarketCapSource, Order, OrderSink, PlacedOrder,
    PriceSource,
};
use rustc_hash::FxHashMap;

use crate::Broker;
use crate::error::BrokerError;

/// How the mock broker handles submitted orders.
#[derive(Clone, Debug)]
pub enum FillMode {
    /// Every order is accepted.
    Accept,
    /// Every order is rejected.
    Reject,
    /// The first `n` orders of each batch are accepted, the rest rejected.
    RejectAfter(usize),
}

/// Builder for `MockBroker`.
pub struct MockBrokerBuilder {
    fill_mode: FillMode,
    prices: FxHashMap<String, f64>,
    balances: Balances,
    fail_cancel: bool,
    fail_balances: bool,
}

impl MockBrokerBuilder {
    pub fn fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn with_balance(mut self, currency: &str, available: f64, total: f64) -> Self {
        self.balances
            .insert(currency.to_string(), Balance::new(available, total));
        self
    }

    /// Make every cancel request fail.
    pub fn fail_cancel(mut self, fail: bool) -> Self {
        self.fail_cancel = fail;
        self
    }

    /// Make balance queries fail.
    pub fn fail_balances(mut self, fail: bool) -> Self {
        self.fail_balances = fail;
        self
    }

    pub fn build(self) -> MockBroker {
        MockBroker {
            connected: false,
            fill_mode: self.fill_mode,
            prices: Mutex::new(self.prices),
            balances: Mutex::new(self.balances),
            fail_cancel: Mutex::new(self.fail_cancel),
            fail_balances: self.fail_balances,
            next_order_id: Mutex::new(1),
            submitted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
        }
    }
}

/// A mock broker that records submitted and cancelled orders.
///
/// Prices and balances can be changed between cycles to simulate drift.
pub struct MockBroker {
    connected: bool,
    fill_mode: FillMode,
    prices: Mutex<FxHashMap<String, f64>>,
    balances: Mutex<Balances>,
    fail_cancel: Mutex<bool>,
    fail_balances: bool,
    next_order_id: Mutex<u64>,
    submitted: Mutex<Vec<Order>>,
    cancelled: Mutex<Vec<PlacedOrder>>,
}

impl MockBroker {
    pub fn builder() -> MockBrokerBuilder {
        MockBrokerBuilder {
            fill_mode: FillMode::Accept,
            prices: FxHashMap::default(),
            balances: Balances::default(),
            fail_cancel: false,
            fail_balances: false,
        }
    }

    /// Orders accepted so far (for assertion in tests).
    pub fn submitted_orders(&self) -> Vec<Order> {
        self.submitted.lock().unwrap().clone()
    }

    /// Orders cancelled so far, including batch rollbacks.
    pub fn cancelled_orders(&self) -> Vec<PlacedOrder> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    pub fn set_balance(&self, currency: &str, available: f64, total: f64) {
        self.balances
            .lock()
            .unwrap()
            .insert(currency.to_string(), Balance::new(available, total));
    }

    pub fn set_fail_cancel(&self, fail: bool) {
        *self.fail_cancel.lock().unwrap() = fail;
    }

    fn require_connected(&self) -> Result<(), BrokerError> {
        if self.connected {
            Ok(())
        } else {
            Err(BrokerError::NotConnected)
        }
    }

    fn submit_one(&self, index: usize, order: &Order) -> Result<PlacedOrder, BrokerError> {
        let accept = match self.fill_mode {
            FillMode::Accept => true,
            FillMode::Reject => false,
            FillMode::RejectAfter(n) => index < n,
        };
        if !accept {
            return Err(BrokerError::Order(format!("mock: {} rejected", order.symbol)));
        }

        let mut next = self.next_order_id.lock().unwrap();
        let id = *next;
        *next += 1;
        self.submitted.lock().unwrap().push(order.clone());
        Ok(PlacedOrder::from_order(id, order))
    }

    fn cancel_one(&self, order: &PlacedOrder) -> Result<(), BrokerError> {
        if *self.fail_cancel.lock().unwrap() {
            return Err(BrokerError::Order(format!("mock: cancel of #{} rejected", order.id)));
        }
        self.cancelled.lock().unwrap().push(order.clone());
        Ok(())
    }
}

impl PriceSource for MockBroker {
    fn last_price(&self, symbol: &str) -> capweight::Result<f64> {
        self.require_connected().map_err(BrokerError::into_data_source)?;
        self.prices
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .ok_or_else(|| BrokerError::InvalidSymbol(symbol.to_string()).into_data_source())
    }
}

impl BalanceSource for MockBroker {
    fn balances(&self) -> capweight::Result<Balances> {
        self.require_connected().map_err(BrokerError::into_data_source)?;
        if self.fail_balances {
            return Err(BrokerError::Connection("mock: balances unavailable".into()).into_data_source());
        }
        Ok(self.balances.lock().unwrap().clone())
    }
}

impl OrderSink for MockBroker {
    fn submit_orders(&self, orders: &[Order]) -> capweight::Result<Vec<PlacedOrder>> {
        self.require_connected().map_err(BrokerError::into_order_sink)?;
        let mut index = 0;
        crate::submit_batch(
            orders,
            |o| {
                let placed = self.submit_one(index, o);
                index += 1;
                placed
            },
            |p| self.cancel_one(p),
        )
        .map_err(BrokerError::into_order_sink)
    }

    fn cancel_orders(&self, orders: &[PlacedOrder]) -> capweight::Result<()> {
        self.require_connected().map_err(BrokerError::into_order_sink)?;
        orders
            .iter()
            .try_for_each(|o| self.cancel_one(o))
            .map_err(BrokerError::into_order_sink)
    }
}

impl Broker for MockBroker {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn connect(&mut self) -> Result<(), BrokerError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), BrokerError> {
        self.connected = false;
        Ok(())
    }
}

/// In-memory market caps. Unknown currencies fail like a data-source outage.
#[derive(Default)]
pub struct MockMarketCaps {
    caps: Mutex<FxHashMap<String, f64>>,
    queries: Mutex<Vec<String>>,
}

impl MockMarketCaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(self, currency: &str, cap_usd: f64) -> Self {
        self.set_cap(currency, cap_usd);
        self
    }

    pub fn set_cap(&self, currency: &str, cap_usd: f64) {
        self.caps.lock().unwrap().insert(currency.to_string(), cap_usd);
    }

    /// Remove a currency so the next query for it fails.
    pub fn remove_cap(&self, currency: &str) {
        self.caps.lock().unwrap().remove(currency);
    }

    /// Currencies queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl MarketCapSource for MockMarketCaps {
    fn market_cap_usd(&self, currency: &str) -> capweight::Result<f64> {
        self.queries.lock().unwrap().push(currency.to_string());
        self.caps
            .lock()
            .unwrap()
            .get(currency)
            .copied()
            .ok_or_else(|| capweight::Error::DataSource(format!("mock: no market cap for {currency}")))
    }
}
