//! API credentials read from the environment.

use crate::error::{Error, Result};

pub const BINANCE_API_KEY: &str = "BINANCE_API_KEY";
pub const BINANCE_SECRET_KEY: &str = "BINANCE_SECRET_KEY";
pub const GLASSNODE_API_KEY: &str = "GLASSNODE_API_KEY";

/// Exchange and market-data keys. Never logged.
#[derive(Clone)]
pub struct Credentials {
    pub binance_api_key: String,
    pub binance_secret_key: String,
    pub glassnode_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    /// Read all keys from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read all keys through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(Error::MissingCredential(name))
        };
        Ok(Self {
            binance_api_key: get(BINANCE_API_KEY)?,
            binance_secret_key: get(BINANCE_SECRET_KEY)?,
            glassnode_api_key: get(GLASSNODE_API_KEY)?,
        })
    }
}
