//! Error types for the rebalancer host.

use std::path::PathBuf;

use capweight_broker::BrokerError;

/// All errors that can occur during rebalancer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("unknown strategy id {0:?}")]
    UnknownStrategy(String),

    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("strategy error: {0}")]
    Strategy(#[from] capweight::Error),

    #[error("execution aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

impl Error {
    /// Whether the error comes from setup rather than from running.
    pub fn is_config(&self) -> bool {
        match self {
            Error::Config(_)
            | Error::ConfigRead { .. }
            | Error::ConfigParse(_)
            | Error::MissingCredential(_)
            | Error::UnknownStrategy(_) => true,
            Error::Strategy(e) => matches!(e, capweight::Error::Config(_)),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
