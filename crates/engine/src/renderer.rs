use std::collections::BTreeMap;

use layers::LayerSpec;
use parking_lot::Mutex;
use streaming::FeatureCollection;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

/// The map surface the engine drives.
///
/// `set_source_data` replaces a source's contents in one step; implementations
/// must never expose a half-updated collection.
pub trait MapRenderer: Send + Sync {
    fn add_source(&self, name: &str, data: &FeatureCollection);
    fn set_source_data(&self, name: &str, data: &FeatureCollection);
    fn add_layer(&self, layer: &LayerSpec);
    fn set_cursor(&self, cursor: Cursor);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    AddSource { name: String, features: usize },
    SetSourceData { name: String, features: usize },
    AddLayer { id: String },
    SetCursor(Cursor),
}

#[derive(Debug, Default)]
struct RecorderState {
    calls: Vec<RenderCall>,
    sources: BTreeMap<String, FeatureCollection>,
    layers: Vec<LayerSpec>,
    cursor: Cursor,
}

/// Headless renderer that keeps the latest state and a log of every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    state: Mutex<RecorderState>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.state.lock().calls.clone()
    }

    pub fn source(&self, name: &str) -> Option<FeatureCollection> {
        self.state.lock().sources.get(name).cloned()
    }

    pub fn layers(&self) -> Vec<LayerSpec> {
        self.state.lock().layers.clone()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.lock().cursor
    }

    /// Number of data replacements applied to any source.
    pub fn data_updates(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RenderCall::SetSourceData { .. }))
            .count()
    }
}

impl MapRenderer for RecordingRenderer {
    fn add_source(&self, name: &str, data: &FeatureCollection) {
        let mut state = self.state.lock();
        state.calls.push(RenderCall::AddSource {
            name: name.to_string(),
            features: data.len(),
        });
        state.sources.insert(name.to_string(), data.clone());
    }

    fn set_source_data(&self, name: &str, data: &FeatureCollection) {
        let mut state = self.state.lock();
        state.calls.push(RenderCall::SetSourceData {
            name: name.to_string(),
            features: data.len(),
        });
        state.sources.insert(name.to_string(), data.clone());
    }

    fn add_layer(&self, layer: &LayerSpec) {
        let mut state = self.state.lock();
        state.calls.push(RenderCall::AddLayer {
            id: layer.id.clone(),
        });
        state.layers.push(layer.clone());
    }

    fn set_cursor(&self, cursor: Cursor) {
        let mut state = self.state.lock();
        state.calls.push(RenderCall::SetCursor(cursor));
        state.cursor = cursor;
    }
}
