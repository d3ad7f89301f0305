//! Orders emitted by the decision engine and handles returned by an order sink.

use std::fmt;

use crate::side::Side;

/// Order type. The rebalancer only places limit orders at the last price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrderType {
    #[default]
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

/// An order to submit, generated fresh each cycle.
///
/// `symbol` is the trading pair: target currency followed by base currency
/// (e.g. `"BTCUSDT"`). `quantity` is always positive; direction lives in
/// `side`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: f64,
    pub price: f64,
}

impl Order {
    /// Limit order at `price`.
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: f64, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price,
        }
    }

    /// Quote-currency value of the order.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} @ {}",
            self.symbol, self.order_type, self.side, self.quantity, self.price
        )
    }
}

/// Handle for an order accepted by an order sink.
///
/// This is the only order identity that survives across cycles; the next
/// cycle uses it to cancel whatever is still open.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedOrder {
    pub id: u64,
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
}

impl PlacedOrder {
    /// Handle for `order` under the sink-assigned `id`.
    pub fn from_order(id: u64, order: &Order) -> Self {
        Self {
            id,
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            price: order.price,
        }
    }
}

impl fmt::Display for PlacedOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} @ {}",
            self.id, self.symbol, self.side, self.quantity, self.price
        )
    }
}
