use std::time::Duration;

use foundation::{BoundsError, GeoBounds};
use parking_lot::Mutex;
use runtime::Debouncer;

/// What a settled viewport calls for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportDecision {
    /// Moved beyond the threshold since the last fetch; fetch these bounds.
    Fetch(GeoBounds),
    /// Within the threshold of the last fetched bounds.
    Unchanged(GeoBounds),
    /// No viewport has been reported yet.
    NoViewport,
}

#[derive(Debug, Default)]
struct ViewportState {
    current: Option<GeoBounds>,
    last_fetched: Option<GeoBounds>,
}

/// Tracks the live viewport and decides when a settled change is worth a fetch.
///
/// Changes restart a single debounce timer; only when it fires is the latest
/// viewport compared against the bounds of the last issued fetch.
#[derive(Debug)]
pub struct ViewportController {
    threshold: f64,
    debouncer: Debouncer,
    state: Mutex<ViewportState>,
}

impl ViewportController {
    pub fn new(debounce: Duration, threshold: f64) -> Self {
        Self {
            threshold,
            debouncer: Debouncer::new(debounce),
            state: Mutex::new(ViewportState::default()),
        }
    }

    /// Record `bounds` as the live viewport and restart the debounce timer.
    ///
    /// Invalid bounds are rejected without touching the timer or the state.
    pub fn on_change<F>(&self, bounds: GeoBounds, on_settle: F) -> Result<GeoBounds, BoundsError>
    where
        F: FnOnce() + Send + 'static,
    {
        let bounds = self.set_current(bounds)?;
        self.debouncer.schedule(on_settle);
        Ok(bounds)
    }

    /// Record `bounds` as the live viewport without scheduling anything.
    pub fn set_current(&self, bounds: GeoBounds) -> Result<GeoBounds, BoundsError> {
        let bounds = bounds.normalized()?;
        self.state.lock().current = Some(bounds);
        Ok(bounds)
    }

    /// Compare the live viewport with the last fetch. A `Fetch` decision is
    /// recorded as the new last-fetched bounds before it is returned.
    pub fn evaluate(&self) -> ViewportDecision {
        let mut state = self.state.lock();
        let Some(current) = state.current else {
            return ViewportDecision::NoViewport;
        };
        if let Some(last) = state.last_fetched
            && last.approx_eq(&current, self.threshold)
        {
            return ViewportDecision::Unchanged(current);
        }
        state.last_fetched = Some(current);
        ViewportDecision::Fetch(current)
    }

    /// Note an unconditional fetch (initial load, post-submit refresh).
    pub fn record_fetch(&self, bounds: GeoBounds) {
        self.state.lock().last_fetched = Some(bounds);
    }

    /// Forget the last fetch if it was for `bounds`, so the next settled
    /// viewport retries instead of being treated as already loaded.
    pub fn forget_fetch(&self, bounds: &GeoBounds) {
        let mut state = self.state.lock();
        if state.last_fetched.as_ref() == Some(bounds) {
            state.last_fetched = None;
        }
    }

    pub fn current(&self) -> Option<GeoBounds> {
        self.state.lock().current
    }

    pub fn last_fetched(&self) -> Option<GeoBounds> {
        self.state.lock().last_fetched
    }

    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drop a pending settle. Returns `true` if a timer was still waiting.
    pub fn cancel_pending(&self) -> bool {
        self.debouncer.cancel()
    }
}
