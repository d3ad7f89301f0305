//! End-to-end scenarios for weights, snapshots, and the decision engine.

use capweight::diff::{adjust_quantity_by_max_amount, compute_orders};
use capweight::snapshot::PortfolioSnapshot;
use capweight::vector;
use capweight::weights::{target_weights, weights_from_market_caps};
use capweight::{Error, Interval, MarketCapSource, Outcome, Side, StrategyConfig};

fn config(threshold: f64, max_amount: f64) -> StrategyConfig {
    let mut c = StrategyConfig::new(Interval::H1, "USD", ["A", "B"]);
    c.base_weight = 0.2;
    c.threshold = threshold;
    c.max_amount = max_amount;
    c
}

struct ZeroCaps;

impl MarketCapSource for ZeroCaps {
    fn market_cap_usd(&self, _currency: &str) -> capweight::Result<f64> {
        Ok(0.0)
    }
}

// ============================================================================
// Weight calculator
// ============================================================================

#[test]
fn market_caps_to_target_vector() {
    let w = weights_from_market_caps(&[300.0, 700.0], 0.2).unwrap();
    assert_eq!(w.len(), 3);
    assert!((w[0] - 0.24).abs() < 1e-12);
    assert!((w[1] - 0.56).abs() < 1e-12);
    assert_eq!(w[2], 0.2);
    assert!((vector::sum(&w) - 1.0).abs() < 1e-12);
}

#[test]
fn zero_market_caps_fail_the_cycle() {
    let targets = vec!["A".to_string(), "B".to_string()];
    let err = target_weights(&targets, &ZeroCaps, 0.2).unwrap_err();
    assert!(matches!(err, Error::DataSource(_)));
    assert!(err.is_cycle_scoped());
}

// ============================================================================
// Snapshot + decision engine
// ============================================================================

#[test]
fn sell_overweight_buy_underweight() {
    let snap = PortfolioSnapshot::from_parts(vec![10.0, 20.0, 1.0], vec![5.0, 1.0, 50.0]);
    assert_eq!(snap.market_values, vec![50.0, 20.0, 50.0]);

    let current = snap.current_weights();
    assert!((current[0] - 0.4167).abs() < 1e-4);
    assert!((current[1] - 0.1667).abs() < 1e-4);
    assert!((current[2] - 0.4167).abs() < 1e-4);

    let target = [0.24, 0.56, 0.2];
    let plan = compute_orders(&config(0.05, 0.0), &snap.prices, &snap.market_values, &target);

    assert!((plan.diffs[0].weight_difference - -0.177).abs() < 1e-3);
    assert!((plan.diffs[1].weight_difference - 0.393).abs() < 1e-3);

    assert_eq!(plan.orders.len(), 2);
    assert_eq!(plan.orders[0].symbol, "AUSD");
    assert_eq!(plan.orders[0].side, Side::Sell);
    assert_eq!(plan.orders[1].symbol, "BUSD");
    assert_eq!(plan.orders[1].side, Side::Buy);
}

#[test]
fn max_amount_cap_scenario() {
    let q = adjust_quantity_by_max_amount(10.0, 20.0, 100.0);
    assert_eq!(q, 5.0);
    assert_eq!(q * 20.0, 100.0);
}

#[test]
fn cap_preserves_side() {
    // A is overweight by enough to sell far more than 15 worth
    let plan = compute_orders(
        &config(0.05, 15.0),
        &[10.0, 20.0, 1.0],
        &[50.0, 20.0, 50.0],
        &[0.24, 0.56, 0.2],
    );
    assert_eq!(plan.orders[0].side, Side::Sell);
    assert_eq!(plan.orders[0].quantity, 1.5);
    assert_eq!(plan.orders[1].side, Side::Buy);
    assert_eq!(plan.orders[1].quantity, 0.75);
    assert_eq!(plan.diffs[0].outcome, Outcome::Ordered { capped: true });
}

#[test]
fn zero_threshold_exact_match_emits_nothing() {
    let snap = PortfolioSnapshot::from_parts(vec![2.0, 4.0, 1.0], vec![12.0, 14.0, 20.0]);
    let target = snap.current_weights();
    let plan = compute_orders(&config(0.0, 0.0), &snap.prices, &snap.market_values, &target);
    assert!(plan.orders.is_empty());
    assert!(plan.diffs.iter().all(|d| d.outcome == Outcome::ZeroQuantity));
}

#[test]
fn empty_account_emits_nothing() {
    let snap = PortfolioSnapshot::from_parts(vec![10.0, 20.0, 1.0], vec![0.0, 0.0, 0.0]);
    let plan = compute_orders(
        &config(0.0, 0.0),
        &snap.prices,
        &snap.market_values,
        &[0.24, 0.56, 0.2],
    );
    assert!(plan.orders.is_empty());
}

#[test]
fn only_base_currency_held_buys_everything() {
    let snap = PortfolioSnapshot::from_parts(vec![10.0, 20.0, 1.0], vec![0.0, 0.0, 1000.0]);
    let plan = compute_orders(
        &config(0.05, 0.0),
        &snap.prices,
        &snap.market_values,
        &[0.24, 0.56, 0.2],
    );
    assert_eq!(plan.orders.len(), 2);
    assert!(plan.orders.iter().all(|o| o.side == Side::Buy));
    // 24% of 1000 at 10 = 24, 56% of 1000 at 20 = 28
    assert!((plan.orders[0].quantity - 24.0).abs() < 1e-9);
    assert!((plan.orders[1].quantity - 28.0).abs() < 1e-9);
}
