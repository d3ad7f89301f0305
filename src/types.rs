//! Core types: balances and trading pair symbols.

use rustc_hash::FxHashMap;

/// Held amount of one currency.
///
/// `available` excludes funds locked in open orders; `total` includes them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Balance {
    pub available: f64,
    pub total: f64,
}

impl Balance {
    pub fn new(available: f64, total: f64) -> Self {
        Self { available, total }
    }

    /// Balance from free and locked amounts as reported by most exchanges.
    pub fn from_free_locked(free: f64, locked: f64) -> Self {
        Self {
            available: free,
            total: free + locked,
        }
    }

    /// Amount in locked funds.
    #[inline]
    pub fn locked(&self) -> f64 {
        self.total - self.available
    }

    /// The amount counted as held under the locked-funds policy.
    ///
    /// When `ignore_locked` is set, locked funds count as held (`total`);
    /// otherwise only `available` does.
    #[inline]
    pub fn held(&self, ignore_locked: bool) -> f64 {
        if ignore_locked {
            self.total
        } else {
            self.available
        }
    }
}

/// Currency → balance. Absent currencies count as zero.
pub type Balances = FxHashMap<String, Balance>;

/// Trading pair for a target currency quoted in the base currency.
#[inline]
pub fn pair_symbol(currency: &str, base_currency: &str) -> String {
    format!("{currency}{base_currency}")
}
