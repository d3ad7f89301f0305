//! CURRENT→TARGET decision engine.
//!
//! Compares the market-value weights of the current holdings against the
//! target weights asset by asset and emits limit orders that close each gap
//! larger than the dead-band. Assets are treated independently: there is no
//! batch-level notional limit and no cross-asset netting. The base currency
//! (last index) never gets an order; it absorbs the residual.

use std::fmt;

use log::{debug, info};

use crate::config::StrategyConfig;
use crate::order::Order;
use crate::side::Side;
use crate::types::pair_symbol;
use crate::vector;

/// What the engine decided for one target asset.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// |difference| below the threshold; no order.
    WithinThreshold,
    /// Difference passed the threshold but the trade quantity is zero.
    ZeroQuantity,
    /// An order was emitted. `capped` is set when the max amount reduced it.
    Ordered { capped: bool },
}

/// Per-asset comparison of current and target weight.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetDiff {
    pub symbol: String,
    pub price: f64,
    pub current_weight: f64,
    pub target_weight: f64,
    /// `target_weight - current_weight`
    pub weight_difference: f64,
    /// Signed quantity before the max-amount cap (zero when within threshold).
    pub raw_quantity: f64,
    pub outcome: Outcome,
}

/// Orders for one cycle plus the per-asset reasoning behind them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalancePlan {
    pub diffs: Vec<AssetDiff>,
    pub orders: Vec<Order>,
}

impl RebalancePlan {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Cap `quantity` so that `quantity * price <= max_amount`.
///
/// A non-positive `max_amount` disables the cap. The capped quantity is the
/// largest float whose notional does not exceed the cap.
pub fn adjust_quantity_by_max_amount(quantity: f64, price: f64, max_amount: f64) -> f64 {
    if max_amount <= 0.0 || quantity * price <= max_amount {
        return quantity;
    }
    let mut capped = max_amount / price;
    // max_amount / price can round up by an ulp
    while capped > 0.0 && capped * price > max_amount {
        capped = f64::from_bits(capped.to_bits() - 1);
    }
    capped
}

/// Decimal places kept in order quantities.
pub const QUANTITY_DECIMALS: i32 = 8;

/// Slack, in steps, for float noise just below a step boundary.
const STEP_TOLERANCE: f64 = 1e-6;

/// Round `quantity` down to a multiple of `10^-QUANTITY_DECIMALS`.
///
/// The result never exceeds `max_amount` in notional when `max_amount` is
/// positive. Quantities smaller than one step become zero.
pub fn quantize_quantity(quantity: f64, price: f64, max_amount: f64) -> f64 {
    let scale = 10f64.powi(QUANTITY_DECIMALS);
    let mut steps = (quantity * scale + STEP_TOLERANCE).floor();
    if max_amount > 0.0 {
        while steps > 0.0 && steps / scale * price > max_amount {
            steps -= 1.0;
        }
    }
    steps.max(0.0) / scale
}

/// Compute the rebalance orders for one cycle.
///
/// `prices`, `market_values`, and `target_weights` must all be aligned with
/// `config.target_currencies` followed by the base currency.
///
/// # Panics
///
/// Panics if any vector's length differs from `config.asset_count()`.
#[track_caller]
pub fn compute_orders(
    config: &StrategyConfig,
    prices: &[f64],
    market_values: &[f64],
    target_weights: &[f64],
) -> RebalancePlan {
    let n = config.asset_count();
    assert!(
        prices.len() == n && market_values.len() == n && target_weights.len() == n,
        "compute_orders: expected {n} assets, got prices={} market_values={} targets={}",
        prices.len(),
        market_values.len(),
        target_weights.len()
    );

    let current_weights = vector::normalize(market_values);
    let total_value = vector::sum(market_values);

    let mut plan = RebalancePlan::default();

    for (i, currency) in config.target_currencies.iter().enumerate() {
        let symbol = pair_symbol(currency, &config.base_currency);
        let price = prices[i];
        let current_weight = current_weights[i];
        let target_weight = target_weights[i];
        let weight_difference = target_weight - current_weight;

        let line = format!(
            "{symbol} price: {price}, current weight: {current_weight:.6}, target weight: {target_weight:.6}"
        );
        if config.verbose {
            info!("{line}");
        } else {
            debug!("{line}");
        }

        let mut diff = AssetDiff {
            symbol,
            price,
            current_weight,
            target_weight,
            weight_difference,
            raw_quantity: 0.0,
            outcome: Outcome::WithinThreshold,
        };

        if weight_difference.abs() < config.threshold {
            info!(
                "{} weight distance |{target_weight:.6} - {current_weight:.6}| = {:.6} less than the threshold {}",
                diff.symbol,
                weight_difference.abs(),
                config.threshold
            );
            plan.diffs.push(diff);
            continue;
        }

        let raw_quantity = weight_difference * total_value / price;
        diff.raw_quantity = raw_quantity;

        let Some(side) = Side::from_signed(raw_quantity) else {
            debug!("{} trade quantity is zero, skipping", diff.symbol);
            diff.outcome = Outcome::ZeroQuantity;
            plan.diffs.push(diff);
            continue;
        };

        let uncapped = raw_quantity.abs();
        let adjusted = adjust_quantity_by_max_amount(uncapped, price, config.max_amount);
        let capped = adjusted < uncapped;
        let quantity = quantize_quantity(adjusted, price, config.max_amount);
        if capped {
            info!(
                "adjust the quantity {uncapped} ({} {side} @ {price}) to {adjusted} by max amount {}",
                diff.symbol, config.max_amount
            );
        }
        if quantity <= 0.0 {
            debug!("{} quantity {adjusted} is below one lot step, skipping", diff.symbol);
            diff.outcome = Outcome::ZeroQuantity;
            plan.diffs.push(diff);
            continue;
        }

        plan.orders
            .push(Order::limit(diff.symbol.clone(), side, quantity, price));
        diff.outcome = Outcome::Ordered { capped };
        plan.diffs.push(diff);
    }

    plan
}

impl fmt::Display for RebalancePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REBALANCE PLAN:")?;
        writeln!(
            f,
            "  {:12} {:>12} {:>9} {:>9} {:>9}  Decision",
            "Symbol", "Price", "Current%", "Target%", "Diff%"
        )?;
        for d in &self.diffs {
            let decision = match d.outcome {
                Outcome::WithinThreshold => "hold (within threshold)",
                Outcome::ZeroQuantity => "hold (zero quantity)",
                Outcome::Ordered { capped: false } => "trade",
                Outcome::Ordered { capped: true } => "trade (capped)",
            };
            writeln!(
                f,
                "  {:12} {:>12.4} {:>8.2}% {:>8.2}% {:>+8.2}%  {decision}",
                d.symbol,
                d.price,
                d.current_weight * 100.0,
                d.target_weight * 100.0,
                d.weight_difference * 100.0,
            )?;
        }
        if self.orders.is_empty() {
            writeln!(f, "\n  No orders.")?;
        } else {
            writeln!(f, "\nORDERS:")?;
            for (i, o) in self.orders.iter().enumerate() {
                writeln!(
                    f,
                    "  {:>3}  {:4} {:12} {:>16.8} @ {:>12.4}  = {:>12.2}",
                    i + 1,
                    o.side,
                    o.symbol,
                    o.quantity,
                    o.price,
                    o.notional(),
                )?;
            }
        }
        Ok(())
    }
}
