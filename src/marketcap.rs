//! Market-cap weighted rebalancing strategy.
//!
//! On every interval close: cancel whatever the previous cycle left open,
//! snapshot prices and balances, derive target weights from market caps,
//! and submit the orders that bring each asset back within the threshold.

use log::{info, warn};

use crate::config::StrategyConfig;
use crate::diff;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::snapshot::{self, PortfolioSnapshot};
use crate::store::OrderStore;
use crate::strategy::{CycleContext, CycleReport, Strategy};
use crate::weights;

/// Registry identifier of [`MarketCapStrategy`].
pub const ID: &str = "marketcap";

/// Market-cap weighted rebalancer. Always holds a validated config.
#[derive(Debug, Clone)]
pub struct MarketCapStrategy {
    config: StrategyConfig,
    store: OrderStore,
}

impl MarketCapStrategy {
    /// Validate `config` and build the strategy.
    pub fn new(config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: OrderStore::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Orders placed by earlier cycles and not yet cancelled.
    #[inline]
    pub fn open_orders(&self) -> &OrderStore {
        &self.store
    }

    /// Run one full rebalance cycle.
    ///
    /// Cancels previously placed orders first; if that fails nothing else
    /// happens. Any data-source failure afterwards aborts before a single
    /// order is submitted.
    pub fn rebalance(&mut self, ctx: &CycleContext<'_>) -> Result<CycleReport> {
        let cancelled = self.store.orders().to_vec();
        if !cancelled.is_empty() {
            info!("cancelling {} open orders", cancelled.len());
            ctx.orders.cancel_orders(&cancelled)?;
            self.store.clear();
        }

        let c = &self.config;
        let prices = snapshot::query_prices(&c.target_currencies, &c.base_currency, ctx.prices)?;
        let target_weights =
            weights::target_weights(&c.target_currencies, ctx.market_caps, c.base_weight)?;

        let balances = ctx.balances.balances()?;
        let quantities = snapshot::quantities(
            &c.target_currencies,
            &c.base_currency,
            &balances,
            c.ignore_locked,
        );
        let snapshot = PortfolioSnapshot::from_parts(prices, quantities);
        self.log_assets(&snapshot);

        let plan = diff::compute_orders(
            c,
            &snapshot.prices,
            &snapshot.market_values,
            &target_weights,
        );
        for order in &plan.orders {
            info!("generated submit order: {order}");
        }

        let mut report = CycleReport {
            cancelled,
            target_weights,
            snapshot: Some(snapshot),
            plan,
            placed: Vec::new(),
            dry_run: c.dry_run,
        };

        if c.dry_run {
            info!("dry run: {} orders not submitted", report.plan.orders.len());
            return Ok(report);
        }
        if report.plan.orders.is_empty() {
            return Ok(report);
        }

        let placed = ctx.orders.submit_orders(&report.plan.orders)?;
        if placed.len() != report.plan.orders.len() {
            warn!(
                "order sink accepted {} of {} orders",
                placed.len(),
                report.plan.orders.len()
            );
        }
        self.store.add(placed.iter().cloned());
        report.placed = placed;
        Ok(report)
    }

    fn log_assets(&self, snapshot: &PortfolioSnapshot) {
        let weights = snapshot.current_weights();
        let n = self.config.target_currencies.len();
        for (i, asset) in self.config.target_currencies.iter().enumerate() {
            info!(
                "asset: {asset}, weight: {:.2}%, qty: {}",
                weights[i] * 100.0,
                snapshot.quantities[i]
            );
        }
        info!(
            "base currency: {}, weight: {:.2}%, qty: {}",
            self.config.base_currency,
            weights[n] * 100.0,
            snapshot.quantities[n]
        );
    }
}

impl Strategy for MarketCapStrategy {
    fn id(&self) -> &'static str {
        ID
    }

    fn interval(&self) -> Interval {
        self.config.interval
    }

    fn symbols(&self) -> Vec<String> {
        self.config.symbols()
    }

    fn on_interval_close(&mut self, ctx: &CycleContext<'_>) -> Result<CycleReport> {
        self.rebalance(ctx)
    }
}

/// Factory used by strategy registries.
pub fn factory(config: &StrategyConfig) -> Result<Box<dyn Strategy>> {
    MarketCapStrategy::new(config.clone()).map(|s| Box::new(s) as Box<dyn Strategy>)
}

impl TryFrom<StrategyConfig> for MarketCapStrategy {
    type Error = Error;

    fn try_from(config: StrategyConfig) -> Result<Self> {
        Self::new(config)
    }
}
