use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use foundation::{Clock, GeoBounds, LonLat, OwnerId, SystemClock};
use layers::{LayerSet, build_layers};
use parking_lot::Mutex;
use runtime::{Event, EventBus, Metrics, MetricsSnapshot};
use streaming::{FeatureCollection, FetchPipeline, NewPoint, PointStore};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::mark_mode::{ClickOutcome, MarkMode};
use crate::renderer::MapRenderer;
use crate::viewport::{ViewportController, ViewportDecision};

/// What a completed fetch did to the render source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The source was replaced with `features` features.
    Applied { features: usize },
    /// A newer response had already been applied; this one was dropped.
    Discarded { seq: u64 },
    /// The renderer has not loaded yet, so nothing was fetched.
    NotLoaded,
}

struct Inner {
    config: EngineConfig,
    layers: LayerSet,
    pipeline: FetchPipeline,
    renderer: Arc<dyn MapRenderer>,
    clock: Arc<dyn Clock>,
    user: OwnerId,
    viewport: ViewportController,
    mode: Mutex<MarkMode>,
    loaded: AtomicBool,
    fetch_seq: AtomicU64,
    applied_seq: Mutex<u64>,
    metrics: Mutex<Metrics>,
    trace: Mutex<EventBus>,
}

pub struct EngineBuilder {
    config: EngineConfig,
    store: Arc<dyn PointStore>,
    renderer: Arc<dyn MapRenderer>,
    clock: Arc<dyn Clock>,
    user: OwnerId,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Identity attached to submitted points. Defaults to the anonymous sentinel.
    pub fn user(mut self, user: OwnerId) -> Self {
        self.user = user;
        self
    }

    pub fn build(self) -> Result<SightingsEngine, EngineError> {
        self.config.validate()?;
        let layers = build_layers(&self.config.layers)
            .map_err(|e| EngineError::InvalidConfig(e.into()))?;
        let viewport =
            ViewportController::new(self.config.debounce, self.config.bounds_threshold_deg);
        let trace = EventBus::with_capacity_limit(self.config.trace_capacity);

        Ok(SightingsEngine {
            inner: Arc::new(Inner {
                pipeline: FetchPipeline::new(self.store, self.config.decay),
                config: self.config,
                layers,
                renderer: self.renderer,
                clock: self.clock,
                user: self.user,
                viewport,
                mode: Mutex::new(MarkMode::Inactive),
                loaded: AtomicBool::new(false),
                fetch_seq: AtomicU64::new(0),
                applied_seq: Mutex::new(0),
                metrics: Mutex::new(Metrics::new()),
                trace: Mutex::new(trace),
            }),
        })
    }
}

/// The viewport-synchronized sightings engine.
///
/// Owns the viewport controller, the last-fetched bounds, and the mark-mode
/// flag; the renderer's point source is written only from here. Cloning is
/// cheap and shares state. Event handlers must run inside a Tokio runtime.
#[derive(Clone)]
pub struct SightingsEngine {
    inner: Arc<Inner>,
}

impl SightingsEngine {
    pub fn builder(store: Arc<dyn PointStore>, renderer: Arc<dyn MapRenderer>) -> EngineBuilder {
        EngineBuilder {
            config: EngineConfig::default(),
            store,
            renderer,
            clock: Arc::new(SystemClock),
            user: OwnerId::anonymous(),
        }
    }

    pub fn new(
        config: EngineConfig,
        store: Arc<dyn PointStore>,
        renderer: Arc<dyn MapRenderer>,
    ) -> Result<Self, EngineError> {
        Self::builder(store, renderer).config(config).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn layers(&self) -> &LayerSet {
        &self.inner.layers
    }

    pub fn user(&self) -> &OwnerId {
        &self.inner.user
    }

    pub fn mark_mode(&self) -> MarkMode {
        *self.inner.mode.lock()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::SeqCst)
    }

    pub fn current_viewport(&self) -> Option<GeoBounds> {
        self.inner.viewport.current()
    }

    pub fn last_fetched_bounds(&self) -> Option<GeoBounds> {
        self.inner.viewport.last_fetched()
    }

    /// True while a viewport change is waiting out the debounce window.
    pub fn is_settling(&self) -> bool {
        self.inner.viewport.is_settling()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.lock().snapshot()
    }

    pub fn trace(&self) -> Vec<Event> {
        self.inner.trace.lock().events().to_vec()
    }

    /// Take the buffered trace events, leaving the buffer empty.
    pub fn drain_trace(&self) -> Vec<Event> {
        self.inner.trace.lock().drain()
    }

    /// Renderer ready: declare the point source (empty), add the layers, and
    /// fetch right away when the viewport is already known. `initial` wins
    /// over a viewport reported before load.
    ///
    /// Calling it again is a no-op.
    pub async fn on_load(&self, initial: Option<GeoBounds>) -> Result<(), EngineError> {
        if self.inner.loaded.swap(true, Ordering::SeqCst) {
            debug!("renderer already loaded");
            return Ok(());
        }

        let renderer = &self.inner.renderer;
        let source = &self.inner.config.layers.source_name;
        renderer.add_source(source, &FeatureCollection::empty());
        for layer in self.inner.layers.iter() {
            renderer.add_layer(layer);
        }
        renderer.set_cursor(self.mark_mode().cursor());
        self.emit("load", format!("source={source}"));
        info!(source = %source, "point source and layers declared");

        let Some(bounds) = initial.or_else(|| self.inner.viewport.current()) else {
            return Ok(());
        };
        // The load fetch supersedes any settle still pending from before load.
        if self.inner.viewport.cancel_pending() {
            debug!("dropping pre-load settle timer");
        }
        let bounds = self.inner.viewport.set_current(bounds).inspect_err(|e| {
            warn!(error = %e, ?bounds, "ignoring invalid initial viewport");
        })?;
        self.inner.viewport.record_fetch(bounds);
        self.fetch_and_apply(bounds).await.map(|_| ())
    }

    /// Renderer viewport moved. Restarts the debounce window; the fetch
    /// decision happens once the viewport has been still for the full window.
    pub fn on_viewport_change(&self, bounds: GeoBounds) -> Result<(), EngineError> {
        self.inner.metrics.lock().inc("viewport.events");

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner
            .viewport
            .on_change(bounds, move || {
                if let Some(inner) = weak.upgrade() {
                    SightingsEngine { inner }.on_viewport_settled();
                }
            })
            .map(|_| ())
            .map_err(|e| {
                warn!(error = %e, ?bounds, "rejecting viewport change");
                self.emit("viewport.invalid", e.to_string());
                EngineError::from(e)
            })
    }

    fn on_viewport_settled(&self) {
        if !self.is_loaded() {
            debug!("viewport settled before load; waiting for load");
            return;
        }

        match self.inner.viewport.evaluate() {
            ViewportDecision::Fetch(bounds) => {
                let engine = self.clone();
                tokio::spawn(async move {
                    // Failures are already logged and counted.
                    let _ = engine.fetch_and_apply(bounds).await;
                });
            }
            ViewportDecision::Unchanged(bounds) => {
                self.inner.metrics.lock().inc("fetch.skipped_within_threshold");
                self.emit("fetch.skipped", format!("{bounds:?}"));
            }
            ViewportDecision::NoViewport => {}
        }
    }

    /// Fetch and apply the current viewport now, bypassing the debounce.
    /// Returns `Ok(None)` when no viewport has been reported yet.
    pub async fn refresh(&self) -> Result<Option<RefreshOutcome>, EngineError> {
        if !self.is_loaded() {
            return Ok(Some(RefreshOutcome::NotLoaded));
        }
        let Some(bounds) = self.inner.viewport.current() else {
            return Ok(None);
        };
        self.inner.viewport.record_fetch(bounds);
        self.fetch_and_apply(bounds).await.map(Some)
    }

    pub fn toggle_mark_mode(&self) -> MarkMode {
        let mode = {
            let mut mode = self.inner.mode.lock();
            *mode = mode.toggled();
            *mode
        };
        self.inner.renderer.set_cursor(mode.cursor());
        self.emit("mark_mode", format!("{mode:?}"));
        mode
    }

    /// Pointer click. Ignored unless mark mode is active and the renderer has
    /// loaded; otherwise the point is submitted and, on success, the current
    /// viewport is reloaded once.
    pub async fn on_click(&self, position: LonLat) -> Result<ClickOutcome, EngineError> {
        if !self.mark_mode().is_active() {
            self.inner.metrics.lock().inc("click.ignored");
            return Ok(ClickOutcome::Ignored);
        }
        if !self.is_loaded() {
            debug!(?position, "click before load; not submitting");
            self.inner.metrics.lock().inc("click.not_loaded");
            return Ok(ClickOutcome::NotLoaded);
        }

        if let Err(e) = position.validate() {
            warn!(error = %e, ?position, "rejecting submission");
            self.inner.metrics.lock().inc("submit.failed");
            self.emit("submit.invalid", e.to_string());
            return Err(e.into());
        }

        let request = NewPoint::new(position, self.inner.user.clone());
        let point = match self.inner.pipeline.store().insert(request).await {
            Ok(point) => point,
            Err(e) => {
                warn!(error = %e, ?position, "point submission failed");
                self.inner.metrics.lock().inc("submit.failed");
                self.emit("submit.failed", e.to_string());
                return Err(e.into());
            }
        };
        self.inner.metrics.lock().inc("submit.ok");
        self.emit("submit.ok", point.id.to_string());

        let refresh = match self.refresh().await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "post-submit refresh failed");
                None
            }
        };
        Ok(ClickOutcome::Submitted { point, refresh })
    }

    async fn fetch_and_apply(&self, bounds: GeoBounds) -> Result<RefreshOutcome, EngineError> {
        if !self.is_loaded() {
            return Ok(RefreshOutcome::NotLoaded);
        }

        let seq = self.inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.metrics.lock().inc("fetch.issued");
        self.emit("fetch.issued", format!("seq={seq} {bounds:?}"));

        let now = self.inner.clock.now();
        match self.inner.pipeline.fetch(bounds, now).await {
            Ok(collection) => Ok(self.apply(seq, collection)),
            Err(e) => {
                self.inner.viewport.forget_fetch(&bounds);
                warn!(error = %e, ?bounds, seq, "fetch failed; keeping current points");
                self.inner.metrics.lock().inc("fetch.failed");
                self.emit("fetch.failed", e.to_string());
                Err(e.into())
            }
        }
    }

    fn apply(&self, seq: u64, collection: FeatureCollection) -> RefreshOutcome {
        // Held across the renderer call so replacements land in decision order.
        let mut applied = self.inner.applied_seq.lock();
        if self.inner.config.discard_stale_responses && seq < *applied {
            debug!(seq, newest = *applied, "discarding stale response");
            self.inner.metrics.lock().inc("fetch.stale_discarded");
            self.emit("fetch.stale", format!("seq={seq}"));
            return RefreshOutcome::Discarded { seq };
        }
        *applied = (*applied).max(seq);

        let features = collection.len();
        self.inner
            .renderer
            .set_source_data(&self.inner.config.layers.source_name, &collection);
        drop(applied);

        {
            let mut metrics = self.inner.metrics.lock();
            metrics.inc("fetch.applied");
            metrics.set_gauge("features.count", features as i64);
            metrics.observe("fetch.features", features as u64);
        }
        self.emit("fetch.applied", format!("seq={seq} features={features}"));
        RefreshOutcome::Applied { features }
    }

    fn emit(&self, kind: &'static str, message: impl Into<String>) {
        self.inner.trace.lock().emit(kind, message);
    }
}
