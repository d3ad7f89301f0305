//! Portfolio snapshot: prices, held quantities, and market values.
//!
//! All three vectors have one entry per target currency in list order, then
//! one for the base currency. The base currency is priced in itself, so its
//! price is always exactly `1.0`.

use log::debug;

use crate::error::{Error, Result};
use crate::source::PriceSource;
use crate::types::{Balances, pair_symbol};
use crate::vector;

/// Last price of each `target + base` pair, with `1.0` appended for the base.
///
/// The first failed query aborts. Non-positive or non-finite prices are
/// rejected so a zero price can never reach the quantity division.
pub fn query_prices(
    targets: &[String],
    base_currency: &str,
    source: &dyn PriceSource,
) -> Result<Vec<f64>> {
    let mut prices = Vec::with_capacity(targets.len() + 1);
    for currency in targets {
        let symbol = pair_symbol(currency, base_currency);
        let price = source.last_price(&symbol)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(Error::DataSource(format!("invalid price for {symbol}: {price}")));
        }
        debug!("{symbol} last price: {price}");
        prices.push(price);
    }
    prices.push(1.0);
    Ok(prices)
}

/// Held amount of each target currency then the base currency.
///
/// `ignore_locked` selects `total` over `available`. Currencies missing from
/// `balances` count as zero.
pub fn quantities(
    targets: &[String],
    base_currency: &str,
    balances: &Balances,
    ignore_locked: bool,
) -> Vec<f64> {
    targets
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(base_currency))
        .map(|currency| {
            balances
                .get(currency)
                .map(|b| b.held(ignore_locked))
                .unwrap_or(0.0)
        })
        .collect()
}

/// Aligned price, quantity, and market value vectors for one cycle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSnapshot {
    pub prices: Vec<f64>,
    pub quantities: Vec<f64>,
    pub market_values: Vec<f64>,
}

impl PortfolioSnapshot {
    /// Snapshot from already-aligned prices and quantities.
    ///
    /// # Panics
    ///
    /// Panics if the vectors differ in length.
    pub fn from_parts(prices: Vec<f64>, quantities: Vec<f64>) -> Self {
        let market_values = vector::elementwise_multiply(&prices, &quantities);
        Self {
            prices,
            quantities,
            market_values,
        }
    }

    /// Query prices and combine them with `balances`.
    pub fn build(
        targets: &[String],
        base_currency: &str,
        prices: &dyn PriceSource,
        balances: &Balances,
        ignore_locked: bool,
    ) -> Result<Self> {
        let prices = query_prices(targets, base_currency, prices)?;
        let quantities = quantities(targets, base_currency, balances, ignore_locked);
        Ok(Self::from_parts(prices, quantities))
    }

    /// Number of assets including the base currency.
    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Sum of market values, in base currency.
    pub fn total_value(&self) -> f64 {
        vector::sum(&self.market_values)
    }

    /// Market-value proportions. All zero when the portfolio is empty.
    pub fn current_weights(&self) -> Vec<f64> {
        vector::normalize(&self.market_values)
    }
}
