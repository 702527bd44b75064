use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Milliseconds since the Unix epoch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMs(pub i64);

impl TimestampMs {
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Self(ms)
    }

    pub fn from_days(days: f64) -> Self {
        Self((days * MILLIS_PER_DAY) as i64)
    }

    /// Age of `self` as seen from `now`, in fractional days.
    ///
    /// Timestamps in the future (clock skew) report an age of zero.
    pub fn age_days(self, now: TimestampMs) -> f64 {
        let delta = now.0.saturating_sub(self.0);
        (delta.max(0) as f64) / MILLIS_PER_DAY
    }

    pub fn saturating_sub_days(self, days: f64) -> Self {
        Self(self.0.saturating_sub((days * MILLIS_PER_DAY) as i64))
    }
}

/// Source of "now" for decay and insert timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimestampMs;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimestampMs {
        TimestampMs::now()
    }
}

/// Clock that only moves when told to. Used by tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start: TimestampMs) -> Self {
        Self {
            ms: AtomicI64::new(start.0),
        }
    }

    pub fn set(&self, t: TimestampMs) {
        self.ms.store(t.0, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: f64) {
        self.ms
            .fetch_add((days * MILLIS_PER_DAY) as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimestampMs {
        TimestampMs(self.ms.load(Ordering::SeqCst))
    }
}
