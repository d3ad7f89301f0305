//! Cycle runner: binds a strategy to a broker and a market-cap source.

use capweight::{CycleContext, CycleReport, MarketCapSource, Strategy};
use capweight_broker::Broker;
use chrono::{DateTime, Utc};
use log::{error, info};

use crate::audit::{self, AuditLog};
use crate::clock::IntervalClock;
use crate::error::Result;

/// Drives one strategy, one cycle per interval close.
///
/// Cycles never overlap: each runs to completion before the runner waits
/// for the next close.
pub struct Runner<B: Broker, M: MarketCapSource> {
    broker: B,
    market_caps: M,
    strategy: Box<dyn Strategy>,
    audit: Option<AuditLog>,
}

impl<B: Broker, M: MarketCapSource> Runner<B, M> {
    /// `broker` must already be connected.
    pub fn new(broker: B, market_caps: M, strategy: Box<dyn Strategy>) -> Self {
        Self {
            broker,
            market_caps,
            strategy,
            audit: None,
        }
    }

    /// Write cycle events to `audit`.
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Run one cycle for the interval that closed at `close`.
    ///
    /// The outcome, success or failure, is written to the audit trail.
    pub fn run_cycle(&mut self, close: DateTime<Utc>) -> Result<CycleReport> {
        info!("{} cycle for close {close}", self.strategy.id());
        if let Some(audit) = self.audit.as_mut() {
            audit::log_cycle_started(audit, close)?;
        }

        let ctx = CycleContext::new(
            &self.market_caps,
            &self.broker,
            &self.broker,
            &self.broker,
        );
        let outcome = self.strategy.on_interval_close(&ctx);

        match outcome {
            Ok(report) => {
                if let Some(audit) = self.audit.as_mut() {
                    audit::log_cycle_report(audit, &report)?;
                }
                info!(
                    "cycle done: {} generated, {} submitted",
                    report.orders().len(),
                    report.placed.len()
                );
                Ok(report)
            }
            Err(e) => {
                if let Some(audit) = self.audit.as_mut() {
                    audit::log_cycle_failed(audit, &e.to_string())?;
                }
                Err(e.into())
            }
        }
    }

    /// Loop forever, running one cycle per interval close.
    ///
    /// A failed cycle is logged and the loop waits for the next close.
    pub fn run(&mut self, clock: &IntervalClock) -> ! {
        info!(
            "running {} on {} closes via {}",
            self.strategy.id(),
            clock.interval(),
            self.broker.name()
        );
        loop {
            let close = clock.wait_next_close();
            if let Err(e) = self.run_cycle(close) {
                error!("cycle for close {close} failed: {e}");
            }
        }
    }

    /// Hand back the broker (still connected) and the market-cap source.
    pub fn into_parts(self) -> (B, M) {
        (self.broker, self.market_caps)
    }
}
