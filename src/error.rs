//! Error taxonomy for the rebalance core.

/// Errors returned by setup validation and by a rebalance cycle.
///
/// Every variant is cycle-scoped except [`Error::Config`], which is only
/// produced before a strategy starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid strategy configuration. Fatal to strategy start.
    #[error("configuration error: {0}")]
    Config(String),

    /// A market-cap, price, or balance query failed or returned unusable data.
    #[error("data source error: {0}")]
    DataSource(String),

    /// Cancelling or submitting orders failed.
    #[error("order sink error: {0}")]
    OrderSink(String),
}

impl Error {
    /// True for errors that only abort the current cycle.
    pub fn is_cycle_scoped(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
