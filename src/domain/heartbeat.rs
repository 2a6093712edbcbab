//! Liveness heartbeat shared between the REST client and the exposition layer.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Wall-clock time of the last node request answered with status < 400.
///
/// Stored as `f64` bits so concurrent scrapes never observe a torn write.
/// Zero means no request has succeeded yet.
#[derive(Debug, Default)]
pub struct Heartbeat {
    last_success_bits: AtomicU64,
}

impl Heartbeat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a successful fetch at the current wall-clock time.
    pub fn record_success(&self) {
        self.record_at(unix_seconds_now());
    }

    pub fn record_at(&self, unix_seconds: f64) {
        self.last_success_bits
            .store(unix_seconds.to_bits(), Ordering::Release);
    }

    /// Unix seconds of the last success, or `None` before the first one.
    #[must_use]
    pub fn last_success(&self) -> Option<f64> {
        let bits = self.last_success_bits.load(Ordering::Acquire);
        (bits != 0).then(|| f64::from_bits(bits))
    }

    /// Gauge value: the last success timestamp, 0 when there was none.
    #[must_use]
    pub fn gauge_value(&self) -> f64 {
        self.last_success().unwrap_or(0.0)
    }

    /// Seconds elapsed since the last success.
    #[must_use]
    pub fn seconds_since_success(&self) -> Option<f64> {
        self.last_success()
            .map(|last| (unix_seconds_now() - last).max(0.0))
    }
}

fn unix_seconds_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
