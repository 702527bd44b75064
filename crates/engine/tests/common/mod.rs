#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use engine::{EngineConfig, RecordingRenderer, SightingsEngine};
use foundation::{GeoBounds, LonLat, ManualClock, OwnerId, PointId, TimestampMs};
use parking_lot::Mutex;
use streaming::{BoxFuture, MemoryPointStore, NewPoint, Point, PointStore, StoreError};

/// Memory store that records calls and can be told to fail or stall.
pub struct ScriptedStore {
    inner: MemoryPointStore,
    queries: Mutex<Vec<GeoBounds>>,
    insert_calls: AtomicUsize,
    fail_queries: AtomicBool,
    fail_inserts: AtomicBool,
    query_delays: Mutex<VecDeque<Duration>>,
}

impl ScriptedStore {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            inner: MemoryPointStore::with_clock(clock),
            queries: Mutex::new(Vec::new()),
            insert_calls: AtomicUsize::new(0),
            fail_queries: AtomicBool::new(false),
            fail_inserts: AtomicBool::new(false),
            query_delays: Mutex::new(VecDeque::new()),
        }
    }

    pub fn seed(&self, id: &str, lon: f64, lat: f64, created_at: TimestampMs) {
        self.inner.seed(
            NewPoint::new(LonLat::new(lon, lat), OwnerId::anonymous())
                .into_point(PointId::new(id), created_at),
        );
    }

    pub fn queries(&self) -> Vec<GeoBounds> {
        self.queries.lock().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Delays applied to upcoming queries, in call order.
    pub fn delay_queries(&self, delays: impl IntoIterator<Item = Duration>) {
        self.query_delays.lock().extend(delays);
    }
}

impl PointStore for ScriptedStore {
    fn query_bounds(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, StoreError>> {
        Box::pin(async move {
            self.queries.lock().push(bounds);
            let delay = self.query_delays.lock().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(StoreError::unreachable("scripted outage"));
            }
            self.inner.query_bounds(bounds).await
        })
    }

    fn insert(&self, point: NewPoint) -> BoxFuture<'_, Result<Point, StoreError>> {
        Box::pin(async move {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_inserts.load(Ordering::SeqCst) {
                return Err(StoreError::unreachable("scripted outage"));
            }
            self.inner.insert(point).await
        })
    }

    fn delete_owned(&self, owner: OwnerId) -> BoxFuture<'_, Result<u64, StoreError>> {
        self.inner.delete_owned(owner)
    }
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub store: Arc<ScriptedStore>,
    pub renderer: Arc<RecordingRenderer>,
    pub engine: SightingsEngine,
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(TimestampMs::from_days(100.0)));
    let store = Arc::new(ScriptedStore::new(clock.clone()));
    let renderer = Arc::new(RecordingRenderer::new());
    let engine = SightingsEngine::builder(store.clone(), renderer.clone())
        .config(config)
        .clock(clock.clone())
        .build()
        .expect("default config is valid");
    Harness {
        clock,
        store,
        renderer,
        engine,
    }
}

/// Irvine-ish test viewport.
pub fn irvine() -> GeoBounds {
    GeoBounds::new(-118.0, 33.4, -117.6, 33.6)
}

/// Let the debounce window elapse and any spawned fetch finish.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(350)).await;
}
