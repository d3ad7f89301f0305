//! Command implementations: wire config, credentials, and venues together.

use capweight::{BalanceSource, CycleReport, PortfolioSnapshot, StrategyConfig};
use capweight_broker::Broker;
use capweight_broker::binance::BinanceBroker;
use capweight_broker::glassnode::GlassnodeSource;
use capweight_broker::glassnode::client::GlassnodeClient;
use chrono::Utc;
use log::info;

use crate::audit::{self, AuditLog};
use crate::clock::IntervalClock;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::registry::StrategyRegistry;
use crate::runner::Runner;

/// Options for `run` and `once`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub force: bool,
}

/// Connect to Binance using the config and credentials.
pub fn connect_binance(config: &Config, creds: &Credentials) -> Result<BinanceBroker> {
    let mut broker = BinanceBroker::new(
        &creds.binance_api_key,
        &creds.binance_secret_key,
        config.exchange.testnet,
    )
    .with_timeout(config.timeout());
    broker.connect()?;
    info!(
        "connected to Binance{}",
        if config.exchange.testnet { " testnet" } else { "" }
    );
    Ok(broker)
}

pub fn glassnode_source(config: &Config, creds: &Credentials) -> Result<GlassnodeSource> {
    let client = GlassnodeClient::new(&creds.glassnode_api_key, config.timeout())?;
    Ok(GlassnodeSource::new(client).with_lookback(config.lookback()))
}

/// The configured strategy settings, with a command-line dry run applied.
pub fn effective_config(config: &Config, dry_run: bool) -> StrategyConfig {
    let mut strategy = config.strategy.config.clone();
    strategy.dry_run |= dry_run;
    strategy
}

/// Loop forever, one cycle per interval close.
pub fn run(config: &Config, registry: &StrategyRegistry, opts: &RunOptions) -> Result<()> {
    let strategy_config = effective_config(config, opts.dry_run);
    let strategy = registry.create(&config.strategy.id, &strategy_config)?;
    let creds = Credentials::from_env()?;

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(&mut audit, &config.strategy.id, &strategy_config)?;

    let broker = connect_binance(config, &creds)?;
    let market_caps = glassnode_source(config, &creds)?;
    let clock = IntervalClock::new(strategy_config.interval);

    Runner::new(broker, market_caps, strategy)
        .with_audit(audit)
        .run(&clock)
}

/// Run a single cycle now.
///
/// Unless dry-running or forced, the plan is previewed first and the user
/// must confirm before any order is cancelled or submitted.
pub fn run_once(config: &Config, registry: &StrategyRegistry, opts: &RunOptions) -> Result<()> {
    let strategy_config = effective_config(config, opts.dry_run);
    let strategy = registry.create(&config.strategy.id, &strategy_config)?;
    let creds = Credentials::from_env()?;

    let mut broker = connect_binance(config, &creds)?;
    let mut market_caps = glassnode_source(config, &creds)?;

    if !strategy_config.dry_run && !opts.force {
        let preview = effective_config(config, true);
        let mut runner = Runner::new(
            broker,
            market_caps,
            registry.create(&config.strategy.id, &preview)?,
        );
        let report = runner.run_cycle(Utc::now())?;
        display_report(&report);

        if report.orders().is_empty() {
            println!("\nNo rebalancing needed.");
            return Ok(());
        }

        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Submit {} orders?", report.orders().len()))
            .default(false)
            .interact()
            .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;
        if !confirmed {
            return Err(Error::Aborted("not confirmed, no orders submitted".into()));
        }
        (broker, market_caps) = runner.into_parts();
    }

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(&mut audit, &config.strategy.id, &strategy_config)?;

    let mut runner = Runner::new(broker, market_caps, strategy).with_audit(audit);
    let report = runner.run_cycle(Utc::now())?;
    display_report(&report);
    if report.dry_run {
        println!("\n[DRY RUN] No orders submitted.");
    } else {
        println!(
            "\n{} orders submitted. Audit logged to {}",
            report.placed.len(),
            config.audit_path().display()
        );
    }
    Ok(())
}

/// Compute and print the plan without submitting anything.
pub fn show_plan(config: &Config, registry: &StrategyRegistry) -> Result<()> {
    let strategy = registry.create(&config.strategy.id, &effective_config(config, true))?;
    let creds = Credentials::from_env()?;
    let broker = connect_binance(config, &creds)?;
    let market_caps = glassnode_source(config, &creds)?;

    let report = Runner::new(broker, market_caps, strategy).run_cycle(Utc::now())?;
    display_report(&report);
    Ok(())
}

/// Print tracked balances with prices and current weights.
pub fn show_balances(config: &Config) -> Result<()> {
    let creds = Credentials::from_env()?;
    let broker = connect_binance(config, &creds)?;
    let s = &config.strategy.config;

    let balances = broker.balances()?;
    let snapshot = PortfolioSnapshot::build(
        &s.target_currencies,
        &s.base_currency,
        &broker,
        &balances,
        s.ignore_locked,
    )?;
    display_balances(config, &snapshot);
    Ok(())
}

/// Check exchange connectivity.
pub fn check_status(config: &Config) -> Result<()> {
    let creds = Credentials::from_env()?;
    print!(
        "Connecting to Binance{}... ",
        if config.exchange.testnet { " testnet" } else { "" }
    );
    let mut broker = connect_binance(config, &creds)?;
    println!("OK");

    let balances = broker.balances()?;
    println!("{} non-empty balances", balances.len());
    broker.disconnect()?;
    Ok(())
}

pub fn list_strategies(registry: &StrategyRegistry) {
    for id in registry.ids() {
        println!("{id}");
    }
}

// === Display ===

fn display_report(report: &CycleReport) {
    if !report.cancelled.is_empty() {
        println!("CANCELLED:");
        for order in &report.cancelled {
            println!("  {order}");
        }
    }

    println!("TARGET WEIGHTS:");
    let symbols = report.diffs().iter().map(|d| d.symbol.as_str());
    for (symbol, weight) in symbols.chain(["base"]).zip(&report.target_weights) {
        println!("  {symbol:10} {:>7.2}%", weight * 100.0);
    }

    println!();
    print!("{}", report.plan);
}

fn display_balances(config: &Config, snapshot: &PortfolioSnapshot) {
    let s = &config.strategy.config;
    let weights = snapshot.current_weights();
    let currencies = s.target_currencies.iter().chain([&s.base_currency]);

    println!(
        "  {:8} {:>16} {:>14} {:>14} {:>8}",
        "Currency", "Quantity", "Price", "Value", "Weight"
    );
    for (i, currency) in currencies.enumerate() {
        println!(
            "  {:8} {:>16.8} {:>14.4} {:>14.2} {:>7.2}%",
            currency,
            snapshot.quantities[i],
            snapshot.prices[i],
            snapshot.market_values[i],
            weights[i] * 100.0,
        );
    }
    println!(
        "\nTotal: {:.2} {}",
        snapshot.total_value(),
        s.base_currency
    );
}
