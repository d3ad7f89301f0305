//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use capweight::StrategyConfig;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub strategy: StrategySection,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub market_cap: MarketCapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[strategy]`: registry id plus the strategy's own settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategySection {
    #[serde(default = "default_strategy_id")]
    pub id: String,
    #[serde(flatten)]
    pub config: StrategyConfig,
}

fn default_strategy_id() -> String {
    capweight::marketcap::ID.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_true")]
    pub testnet: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            testnet: default_true(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketCapConfig {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u64,
}

impl Default for MarketCapConfig {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
        }
    }
}

fn default_lookback_days() -> u64 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if self.strategy.id.is_empty() {
            return Err(Error::Config("strategy id must not be empty".into()));
        }
        if self.exchange.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be > 0".into()));
        }
        if self.market_cap.lookback_days == 0 {
            return Err(Error::Config("lookback_days must be > 0".into()));
        }
        self.strategy.config.validate()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.exchange.timeout_secs)
    }

    pub fn lookback(&self) -> Duration {
        Duration::from_secs(self.market_cap.lookback_days * 24 * 60 * 60)
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
