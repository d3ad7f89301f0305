//! JSONL audit trail logging.
//!
//! Each rebalancer run appends events to an audit.jsonl file,
//! one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use capweight::{CycleReport, StrategyConfig};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn log_run_started(audit: &mut AuditLog, strategy_id: &str, config: &StrategyConfig) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "strategy": strategy_id,
            "interval": config.interval.as_str(),
            "base_currency": config.base_currency,
            "target_currencies": config.target_currencies,
            "dry_run": config.dry_run,
        }),
    )
}

pub fn log_cycle_started(audit: &mut AuditLog, close: DateTime<Utc>) -> Result<()> {
    audit.log("cycle_started", serde_json::json!({ "close": close }))
}

/// Log everything a successful cycle computed, then its completion.
pub fn log_cycle_report(audit: &mut AuditLog, report: &CycleReport) -> Result<()> {
    audit.log(
        "target_weights",
        serde_json::json!({ "weights": report.target_weights }),
    )?;
    if let Some(snapshot) = &report.snapshot {
        audit.log(
            "snapshot",
            serde_json::json!({
                "prices": snapshot.prices,
                "quantities": snapshot.quantities,
                "market_values": snapshot.market_values,
                "current_weights": snapshot.current_weights(),
            }),
        )?;
    }
    audit.log(
        "orders_generated",
        serde_json::json!({
            "orders": report.orders(),
            "diffs": report.diffs(),
        }),
    )?;
    if !report.placed.is_empty() {
        audit.log(
            "orders_submitted",
            serde_json::json!({ "placed": report.placed }),
        )?;
    }
    audit.log(
        "cycle_completed",
        serde_json::json!({
            "cancelled": report.cancelled.len(),
            "generated": report.orders().len(),
            "submitted": report.placed.len(),
            "dry_run": report.dry_run,
        }),
    )
}

pub fn log_cycle_failed(audit: &mut AuditLog, error: &str) -> Result<()> {
    audit.log("cycle_failed", serde_json::json!({ "error": error }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use capweight::{Order, PlacedOrder, RebalancePlan, Side};

    fn read_events(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn audit_log_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_audit.jsonl");

        {
            let mut log = AuditLog::open(&path).unwrap();
            log.log("test_event", serde_json::json!({})).unwrap();
            log.log("test_data", serde_json::json!({"key": "value"}))
                .unwrap();
        }

        let events = read_events(&path);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "test_event");
        assert_eq!(events[1]["key"], "value");
        assert!(events[1]["ts"].is_string());
    }

    #[test]
    fn audit_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("deep").join("audit.jsonl");

        let mut log = AuditLog::open(&path).unwrap();
        log.log("test", serde_json::json!({})).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn cycle_report_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let order = Order::limit("BTCUSDT", Side::Buy, 0.01, 40_000.0);
        let report = CycleReport {
            target_weights: vec![0.8, 0.2],
            plan: RebalancePlan {
                diffs: Vec::new(),
                orders: vec![order.clone()],
            },
            placed: vec![PlacedOrder::from_order(7, &order)],
            ..Default::default()
        };

        let mut log = AuditLog::open(&path).unwrap();
        log_cycle_report(&mut log, &report).unwrap();

        let events = read_events(&path);
        let names: Vec<_> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["target_weights", "orders_generated", "orders_submitted", "cycle_completed"]
        );
        assert_eq!(events[1]["orders"][0]["symbol"], "BTCUSDT");
        assert_eq!(events[2]["placed"][0]["id"], 7);
        assert_eq!(events[3]["submitted"], 1);
    }
}
