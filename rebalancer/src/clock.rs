//! Interval clock: waits for candle closes aligned to the Unix epoch.

use std::thread;

use capweight::Interval;
use chrono::{DateTime, TimeZone, Utc};

/// First close of `interval` strictly after `now`.
///
/// Closes are aligned to the Unix epoch, so hourly closes fall on the hour
/// and daily closes at 00:00 UTC. Weekly closes fall on Monday 00:00 UTC.
pub fn next_close(now: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    let step = interval.seconds() as i64;
    let anchor = interval.anchor_seconds() as i64;
    let next = ((now.timestamp() - anchor).div_euclid(step) + 1) * step + anchor;
    Utc.timestamp_opt(next, 0).single().unwrap_or(now)
}

/// Blocks the calling thread until the next close.
#[derive(Debug, Clone, Copy)]
pub struct IntervalClock {
    interval: Interval,
}

impl IntervalClock {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Sleep until the next close and return its time.
    pub fn wait_next_close(&self) -> DateTime<Utc> {
        let close = next_close(Utc::now(), self.interval);
        loop {
            let now = Utc::now();
            if now >= close {
                return close;
            }
            match (close - now).to_std() {
                Ok(remaining) => thread::sleep(remaining),
                Err(_) => return close,
            }
        }
    }
}
