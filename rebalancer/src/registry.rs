//! Strategy registry: maps configuration ids to strategy factories.

use std::collections::BTreeMap;

use capweight::{Strategy, StrategyConfig};

use crate::error::{Error, Result};

/// Builds a strategy from its validated configuration.
pub type Factory = fn(&StrategyConfig) -> capweight::Result<Box<dyn Strategy>>;

/// Strategy ids known to this host.
///
/// Created once at startup and passed to whoever builds strategies.
#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, Factory>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in strategy.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(capweight::marketcap::ID, capweight::marketcap::factory);
        registry
    }

    /// Register `factory` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: &str, factory: Factory) {
        self.factories.insert(id.to_string(), factory);
    }

    /// Build the strategy registered under `id`.
    pub fn create(&self, id: &str, config: &StrategyConfig) -> Result<Box<dyn Strategy>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| Error::UnknownStrategy(id.to_string()))?;
        Ok(factory(config)?)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capweight::Interval;

    fn config() -> StrategyConfig {
        StrategyConfig::new(Interval::H1, "USDT", ["BTC", "ETH"])
    }

    #[test]
    fn builtin_marketcap() {
        let registry = StrategyRegistry::with_builtin();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["marketcap"]);

        let strategy = registry.create("marketcap", &config()).unwrap();
        assert_eq!(strategy.id(), "marketcap");
        assert_eq!(strategy.interval(), Interval::H1);
        assert_eq!(strategy.symbols(), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn unknown_id() {
        let registry = StrategyRegistry::with_builtin();
        assert!(matches!(
            registry.create("momentum", &config()),
            Err(Error::UnknownStrategy(_))
        ));
    }

    #[test]
    fn factory_validates_config() {
        let registry = StrategyRegistry::with_builtin();
        let mut bad = config();
        bad.target_currencies.clear();
        let err = registry.create("marketcap", &bad).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn empty_registry() {
        let registry = StrategyRegistry::new();
        assert!(!registry.contains("marketcap"));
    }
}
