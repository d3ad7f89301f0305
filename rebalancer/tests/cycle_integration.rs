//! Full rebalance cycles against the mock broker and market-cap source.

use capweight::{Interval, Side, StrategyConfig};
use capweight_broker::Broker;
use capweight_broker::mock::{FillMode, MockBroker, MockMarketCaps};
use capweight_rebalancer::audit::{self, AuditLog};
use capweight_rebalancer::error::Error;
use capweight_rebalancer::registry::StrategyRegistry;
use capweight_rebalancer::runner::Runner;
use chrono::{DateTime, Utc};

fn close() -> DateTime<Utc> {
    "2024-03-01T11:00:00Z".parse().unwrap()
}

fn config() -> StrategyConfig {
    let mut c = StrategyConfig::new(Interval::H1, "USDT", ["BTC", "ETH"]);
    c.base_weight = 0.2;
    c.threshold = 0.05;
    c
}

/// BTC 40k, ETH 2k. Holdings: 0.25 BTC (10k), 0 ETH, 10k USDT → 50/0/50.
fn broker(mode: FillMode) -> MockBroker {
    let mut broker = MockBroker::builder()
        .fill_mode(mode)
        .with_price("BTCUSDT", 40_000.0)
        .with_price("ETHUSDT", 2_000.0)
        .with_balance("BTC", 0.25, 0.25)
        .with_balance("USDT", 10_000.0, 10_000.0)
        .build();
    broker.connect().unwrap();
    broker
}

/// Caps 600 / 400 → targets 48% / 32% / 20%.
fn caps() -> MockMarketCaps {
    MockMarketCaps::new()
        .with_cap("BTC", 600e9)
        .with_cap("ETH", 400e9)
}

fn runner(
    mode: FillMode,
    config: &StrategyConfig,
) -> Runner<MockBroker, MockMarketCaps> {
    let strategy = StrategyRegistry::with_builtin()
        .create("marketcap", config)
        .unwrap();
    Runner::new(broker(mode), caps(), strategy)
}

fn events(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["event"].as_str().unwrap().to_string()
        })
        .collect()
}

#[test]
fn cycle_buys_underweight_and_tracks_orders() {
    let mut runner = runner(FillMode::Accept, &config());
    let report = runner.run_cycle(close()).unwrap();

    // BTC 50% vs 48%: inside the 5% band. ETH 0% vs 32%: buy.
    assert_eq!(report.orders().len(), 1);
    let order = &report.orders()[0];
    assert_eq!(order.symbol, "ETHUSDT");
    assert_eq!(order.side, Side::Buy);
    assert!((order.quantity - 3.2).abs() < 1e-9, "0.32 * 20000 / 2000");
    assert_eq!(report.placed.len(), 1);
    assert_eq!(runner.broker().submitted_orders().len(), 1);
}

#[test]
fn second_cycle_cancels_previous_orders() {
    let mut runner = runner(FillMode::Accept, &config());
    let first = runner.run_cycle(close()).unwrap();
    let second = runner.run_cycle(close()).unwrap();

    assert_eq!(second.cancelled, first.placed);
    assert_eq!(runner.broker().cancelled_orders(), first.placed);
    assert_eq!(runner.broker().submitted_orders().len(), 2);
}

#[test]
fn dry_run_submits_nothing() {
    let mut c = config();
    c.dry_run = true;
    let mut runner = runner(FillMode::Accept, &c);
    let report = runner.run_cycle(close()).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.orders().len(), 1);
    assert!(report.placed.is_empty());
    assert!(runner.broker().submitted_orders().is_empty());
}

#[test]
fn max_amount_caps_order_notional() {
    let mut c = config();
    c.max_amount = 1_000.0;
    let mut runner = runner(FillMode::Accept, &c);
    let report = runner.run_cycle(close()).unwrap();

    let order = &report.orders()[0];
    assert!(order.notional() <= 1_000.0);
    assert!(order.quantity > 0.49);
}

#[test]
fn missing_market_cap_fails_cycle_without_orders() {
    let caps = MockMarketCaps::new().with_cap("BTC", 600e9);
    let strategy = StrategyRegistry::with_builtin()
        .create("marketcap", &config())
        .unwrap();
    let mut runner = Runner::new(broker(FillMode::Accept), caps, strategy);

    let err = runner.run_cycle(close()).unwrap_err();
    assert!(matches!(err, Error::Strategy(capweight::Error::DataSource(_))));
    assert!(runner.broker().submitted_orders().is_empty());
}

#[test]
fn rejected_batch_is_rolled_back_and_not_tracked() {
    let mut c = config();
    c.threshold = 0.0;
    let mut runner = runner(FillMode::RejectAfter(1), &c);

    let err = runner.run_cycle(close()).unwrap_err();
    assert!(matches!(err, Error::Strategy(capweight::Error::OrderSink(_))));
    let rolled_back = runner.broker().cancelled_orders();
    assert_eq!(rolled_back.len(), 1);
    assert_eq!(rolled_back[0].symbol, "BTCUSDT");

    // Nothing was tracked, so the next cycle cancels nothing.
    let next = runner.run_cycle(close());
    assert!(next.is_err());
    assert_eq!(runner.broker().cancelled_orders().len(), 2, "only the new rollback");
}

#[test]
fn cancel_failure_blocks_submission() {
    let mut runner = runner(FillMode::Accept, &config());
    runner.run_cycle(close()).unwrap();

    runner.broker().set_fail_cancel(true);
    let err = runner.run_cycle(close()).unwrap_err();
    assert!(matches!(err, Error::Strategy(capweight::Error::OrderSink(_))));
    assert_eq!(runner.broker().submitted_orders().len(), 1);

    // The open order is still tracked and cancelled once the venue recovers.
    runner.broker().set_fail_cancel(false);
    let report = runner.run_cycle(close()).unwrap();
    assert_eq!(report.cancelled.len(), 1);
}

#[test]
fn audit_trail_records_cycles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("audit.jsonl");

    let mut audit_log = AuditLog::open(&path).unwrap();
    audit::log_run_started(&mut audit_log, "marketcap", &config()).unwrap();

    let mut runner = runner(FillMode::Accept, &config()).with_audit(audit_log);
    runner.run_cycle(close()).unwrap();

    assert_eq!(
        events(&path),
        vec![
            "run_started",
            "cycle_started",
            "target_weights",
            "snapshot",
            "orders_generated",
            "orders_submitted",
            "cycle_completed",
        ]
    );
}

#[test]
fn audit_trail_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");

    let strategy = StrategyRegistry::with_builtin()
        .create("marketcap", &config())
        .unwrap();
    let mut runner = Runner::new(broker(FillMode::Accept), MockMarketCaps::new(), strategy)
        .with_audit(AuditLog::open(&path).unwrap());

    assert!(runner.run_cycle(close()).is_err());
    assert_eq!(events(&path), vec!["cycle_started", "cycle_failed"]);
}
