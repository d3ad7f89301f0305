//! Exchange and market-data adapters for capweight.
//!
//! Binds the capability traits of the rebalance core to real services.
//! Implementations:
//!
//! - **Binance** (feature `binance`): spot REST API for prices, balances, and
//!   limit orders
//! - **Glassnode** (feature `glassnode`): USD market caps
//! - **Mock** (always): in-memory broker and market-cap source for tests

pub mod error;
pub mod mock;

#[cfg(feature = "binance")]
pub mod binance;

#[cfg(feature = "glassnode")]
pub mod glassnode;

pub use error::BrokerError;

use capweight::{BalanceSource, Order, OrderSink, PlacedOrder, PriceSource};
use log::warn;

/// An exchange connection that prices pairs, reports balances, and takes orders.
pub trait Broker: PriceSource + BalanceSource + OrderSink {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Connect to the broker.
    fn connect(&mut self) -> Result<(), BrokerError>;

    /// Disconnect gracefully.
    fn disconnect(&mut self) -> Result<(), BrokerError>;
}

/// Submit `orders` one by one, all or nothing.
///
/// If any submission fails, orders already placed by this batch are
/// cancelled (best effort) before the error is returned, so a failed batch
/// never leaves a partial set of orders on the book untracked.
pub fn submit_batch<S, C>(
    orders: &[Order],
    mut submit: S,
    mut cancel: C,
) -> Result<Vec<PlacedOrder>, BrokerError>
where
    S: FnMut(&Order) -> Result<PlacedOrder, BrokerError>,
    C: FnMut(&PlacedOrder) -> Result<(), BrokerError>,
{
    let mut placed = Vec::with_capacity(orders.len());
    for order in orders {
        match submit(order) {
            Ok(p) => placed.push(p),
            Err(e) => {
                for p in &placed {
                    if let Err(cancel_err) = cancel(p) {
                        warn!("rollback cancel of {p} failed: {cancel_err}");
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(placed)
}
