use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

/// Single-slot restartable timer.
///
/// At most one timer is pending per `Debouncer`. Scheduling a new one aborts
/// the previous timer before the new one is spawned, under the same lock, so
/// two timers never coexist. A generation counter is checked again when the
/// timer fires, which keeps the guarantee on multi-threaded runtimes where an
/// abort can race a timer that has already woken up.
///
/// The callback runs synchronously on the timer task and should only hand work
/// off (e.g. spawn a fetch). Anything it spawns is not cancelled by a later
/// `schedule` or `cancel`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// (Re)start the timer. Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(prev) = pending.take() {
            prev.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let delay = self.delay;

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                trace!(generation, "debounce timer superseded");
                return;
            }
            on_fire();
        }));
    }

    /// Cancel the pending timer, if any. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        match pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::Debouncer;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Box<dyn FnOnce() + Send>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let make = move || {
            let h = Arc::clone(&h);
            Box::new(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }) as Box<dyn FnOnce() + Send>
        };
        (hits, make)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, make) = counter();

        d.schedule(make());
        assert!(d.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_resets_instead_of_queueing() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, make) = counter();

        for _ in 0..5 {
            d.schedule(make());
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_fire() {
        let d = Debouncer::new(Duration::from_millis(300));
        let (hits, make) = counter();

        d.schedule(make());
        assert!(d.cancel());
        assert!(!d.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
