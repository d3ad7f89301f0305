//! Strategy abstraction driven by interval closes.

use crate::diff::{AssetDiff, RebalancePlan};
use crate::error::Result;
use crate::interval::Interval;
use crate::order::{Order, PlacedOrder};
use crate::snapshot::PortfolioSnapshot;
use crate::source::{BalanceSource, MarketCapSource, OrderSink, PriceSource};

/// Capabilities available to a strategy during one cycle.
#[derive(Clone, Copy)]
pub struct CycleContext<'a> {
    pub market_caps: &'a dyn MarketCapSource,
    pub prices: &'a dyn PriceSource,
    pub balances: &'a dyn BalanceSource,
    pub orders: &'a dyn OrderSink,
}

impl<'a> CycleContext<'a> {
    pub fn new(
        market_caps: &'a dyn MarketCapSource,
        prices: &'a dyn PriceSource,
        balances: &'a dyn BalanceSource,
        orders: &'a dyn OrderSink,
    ) -> Self {
        Self {
            market_caps,
            prices,
            balances,
            orders,
        }
    }
}

/// Everything one successful cycle computed and did.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleReport {
    /// Orders cancelled at the start of the cycle.
    pub cancelled: Vec<PlacedOrder>,
    pub target_weights: Vec<f64>,
    pub snapshot: Option<PortfolioSnapshot>,
    pub plan: RebalancePlan,
    /// Orders accepted by the sink. Empty on a dry run.
    pub placed: Vec<PlacedOrder>,
    pub dry_run: bool,
}

impl CycleReport {
    /// Orders generated this cycle.
    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.plan.orders
    }

    #[inline]
    pub fn diffs(&self) -> &[AssetDiff] {
        &self.plan.diffs
    }
}

/// A strategy invoked once per closed interval.
///
/// The host serializes invocations: a cycle runs to completion (or fails)
/// before the next close is delivered, so implementations need no locking.
pub trait Strategy {
    /// Registry identifier.
    fn id(&self) -> &'static str;

    /// Interval whose close triggers a cycle.
    fn interval(&self) -> Interval;

    /// Trading pairs the strategy needs market data for.
    fn symbols(&self) -> Vec<String>;

    /// Run one cycle. An error aborts this cycle only.
    fn on_interval_close(&mut self, ctx: &CycleContext<'_>) -> Result<CycleReport>;
}
