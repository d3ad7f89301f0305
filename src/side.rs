//! Order side: Buy or Sell

use std::fmt;

/// Side of a rebalance order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side implied by a signed trade quantity: positive buys, negative sells.
    ///
    /// Returns `None` for zero and for non-finite quantities.
    #[inline]
    pub fn from_signed(quantity: f64) -> Option<Self> {
        if !quantity.is_finite() || quantity == 0.0 {
            None
        } else if quantity > 0.0 {
            Some(Side::Buy)
        } else {
            Some(Side::Sell)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
