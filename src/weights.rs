//! Target weights from market capitalization.
//!
//! Each target currency gets a share of `1 - base_weight` proportional to its
//! USD market cap. The base currency's weight is appended last, so the
//! result is aligned with every other per-cycle vector.

use log::debug;

use crate::error::{Error, Result};
use crate::source::MarketCapSource;
use crate::vector;

/// Query market caps for `targets` in order. The first failure aborts.
///
/// Negative and non-finite figures are rejected as data-source errors.
pub fn market_caps(targets: &[String], source: &dyn MarketCapSource) -> Result<Vec<f64>> {
    targets
        .iter()
        .map(|currency| {
            let cap = source.market_cap_usd(currency)?;
            if !cap.is_finite() || cap < 0.0 {
                return Err(Error::DataSource(format!(
                    "invalid market cap for {currency}: {cap}"
                )));
            }
            debug!("{currency} market cap: {cap} USD");
            Ok(cap)
        })
        .collect()
}

/// Convert raw market caps into a target weight vector of length N+1.
///
/// Fails with [`Error::DataSource`] when the caps sum to zero: there is no
/// proportional split of nothing, and a zero target would liquidate every
/// asset.
pub fn weights_from_market_caps(caps: &[f64], base_weight: f64) -> Result<Vec<f64>> {
    let total = vector::sum(caps);
    if total <= 0.0 {
        return Err(Error::DataSource(format!(
            "market caps sum to {total}; cannot derive target weights"
        )));
    }
    let mut weights = vector::scale(&vector::normalize(caps), 1.0 - base_weight);
    weights.push(base_weight);
    Ok(weights)
}

/// Fetch market caps and compute target weights for one cycle.
pub fn target_weights(
    targets: &[String],
    source: &dyn MarketCapSource,
    base_weight: f64,
) -> Result<Vec<f64>> {
    let caps = market_caps(targets, source)?;
    weights_from_market_caps(&caps, base_weight)
}
