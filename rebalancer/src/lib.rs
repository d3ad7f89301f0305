//! capweight-rebalancer: periodic market-cap weighted rebalancer.
//!
//! Reads a TOML config, builds the configured strategy from the registry,
//! binds it to Binance for prices, balances and orders and to Glassnode for
//! market caps, and runs one cycle per interval close with a JSONL audit
//! trail.

pub mod audit;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod execution;
pub mod registry;
pub mod runner;
