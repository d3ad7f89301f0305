//! # capweight
//!
//! Market-cap weighted target allocation and rebalance order generation.
//!
//! Each cycle turns USD market caps into target weights, compares them with
//! the market-value weights of the current holdings, and emits limit orders
//! for every asset whose deviation exceeds a dead-band threshold.
//!
//! ## Vector layout
//!
//! A cycle tracks N target currencies plus one base currency. Every
//! per-cycle vector (weights, prices, quantities, market values) has N+1
//! entries: the targets in configured order, then the base currency last.
//!
//! ## Quick Start
//!
//! ```
//! use capweight::{Interval, Side, StrategyConfig};
//! use capweight::diff::compute_orders;
//! use capweight::weights::weights_from_market_caps;
//!
//! let mut config = StrategyConfig::new(Interval::H1, "USD", ["A", "B"]);
//! config.base_weight = 0.2;
//! config.threshold = 0.05;
//! config.validate().unwrap();
//!
//! // Market caps 300 / 700 → 24% / 56% / 20% base
//! let targets = weights_from_market_caps(&[300.0, 700.0], config.base_weight).unwrap();
//! assert!((targets[0] - 0.24).abs() < 1e-12);
//! assert_eq!(targets[2], 0.2);
//!
//! // Holdings worth 50 / 20 / 50 → A is overweight, B underweight
//! let prices = [10.0, 20.0, 1.0];
//! let market_values = [50.0, 20.0, 50.0];
//! let plan = compute_orders(&config, &prices, &market_values, &targets);
//!
//! assert_eq!(plan.orders.len(), 2);
//! assert_eq!(plan.orders[0].side, Side::Sell);
//! assert_eq!(plan.orders[1].side, Side::Buy);
//! ```
//!
//! ## Running cycles
//!
//! [`MarketCapStrategy`] drives the full cycle against the capability traits
//! in [`source`]: cancel previously placed orders, query prices, compute
//! target weights, read balances, compute and submit orders. Hosts bind the
//! traits to real venues and call [`Strategy::on_interval_close`] once per
//! closed interval.

mod config;
pub mod diff;
mod error;
mod interval;
pub mod marketcap;
mod order;
mod side;
pub mod snapshot;
pub mod source;
mod store;
mod strategy;
mod types;
pub mod vector;
pub mod weights;

// Re-export public API
pub use config::StrategyConfig;
pub use diff::{AssetDiff, Outcome, RebalancePlan};
pub use error::{Error, Result};
pub use interval::Interval;
pub use marketcap::MarketCapStrategy;
pub use order::{Order, OrderType, PlacedOrder};
pub use side::Side;
pub use snapshot::PortfolioSnapshot;
pub use source::{BalanceSource, MarketCapSource, OrderSink, PriceSource};
pub use store::OrderStore;
pub use strategy::{CycleContext, CycleReport, Strategy};
pub use types::{Balance, Balances, pair_symbol};
