//! Strategy configuration and setup-time validation.

use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::types::pair_symbol;

/// Immutable per-run configuration of the market-cap rebalancer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyConfig {
    /// Candle interval whose close triggers a cycle.
    pub interval: Interval,
    /// Reserve currency held as the residual weight slot.
    pub base_currency: String,
    /// Fraction of the portfolio reserved for the base currency, in `[0, 1)`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base_weight: f64,
    /// Actively rebalanced currencies, in vector order.
    pub target_currencies: Vec<String>,
    /// Minimum absolute weight deviation before an order is generated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub threshold: f64,
    /// Count funds locked in open orders as held.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignore_locked: bool,
    /// Log per-asset detail at info level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,
    /// Compute and log orders without submitting them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dry_run: bool,
    /// Max notional per order in base currency. Zero disables the cap.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_amount: f64,
}

impl StrategyConfig {
    /// Minimal config with defaults for every optional field.
    pub fn new(
        interval: Interval,
        base_currency: impl Into<String>,
        target_currencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            interval,
            base_currency: base_currency.into(),
            base_weight: 0.0,
            target_currencies: target_currencies.into_iter().map(Into::into).collect(),
            threshold: 0.0,
            ignore_locked: false,
            verbose: false,
            dry_run: false,
            max_amount: 0.0,
        }
    }

    /// Validate config invariants. Run once before any cycle.
    pub fn validate(&self) -> Result<()> {
        if self.target_currencies.is_empty() {
            return Err(Error::Config("target_currencies should not be empty".into()));
        }
        if self.base_currency.is_empty() {
            return Err(Error::Config("base_currency should not be empty".into()));
        }
        for (i, currency) in self.target_currencies.iter().enumerate() {
            if currency.is_empty() {
                return Err(Error::Config(format!("target currency #{i} is empty")));
            }
            if *currency == self.base_currency {
                return Err(Error::Config(format!(
                    "target_currencies contain base_currency {}",
                    self.base_currency
                )));
            }
            if self.target_currencies[..i].contains(currency) {
                return Err(Error::Config(format!("duplicate target currency: {currency}")));
            }
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::Config(format!(
                "threshold should not be less than 0, got {}",
                self.threshold
            )));
        }
        if !self.max_amount.is_finite() || self.max_amount < 0.0 {
            return Err(Error::Config(format!(
                "max_amount should not be less than 0, got {}",
                self.max_amount
            )));
        }
        if !self.base_weight.is_finite() || !(0.0..1.0).contains(&self.base_weight) {
            return Err(Error::Config(format!(
                "base_weight must be in [0, 1), got {}",
                self.base_weight
            )));
        }
        Ok(())
    }

    /// Number of tracked assets including the base currency (N+1).
    #[inline]
    pub fn asset_count(&self) -> usize {
        self.target_currencies.len() + 1
    }

    /// Trading pairs of the target currencies, in target order.
    pub fn symbols(&self) -> Vec<String> {
        self.target_currencies
            .iter()
            .map(|c| pair_symbol(c, &self.base_currency))
            .collect()
    }
}
