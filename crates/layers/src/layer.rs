use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Heatmap,
    Circle,
}

/// Declarative layer description handed to the renderer.
///
/// Paint properties live in a sorted map so serialization is byte-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,
    pub paint: BTreeMap<String, Value>,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, kind: LayerKind, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            minzoom: None,
            maxzoom: None,
            paint: BTreeMap::new(),
        }
    }

    pub fn with_minzoom(mut self, zoom: f64) -> Self {
        self.minzoom = Some(zoom);
        self
    }

    pub fn with_maxzoom(mut self, zoom: f64) -> Self {
        self.maxzoom = Some(zoom);
        self
    }

    pub fn with_paint(mut self, key: &str, value: Value) -> Self {
        self.paint.insert(key.to_string(), value);
        self
    }

    pub fn paint(&self, key: &str) -> Option<&Value> {
        self.paint.get(key)
    }
}

/// The pair of layers drawn over the point source, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSet {
    pub heatmap: LayerSpec,
    pub circle: LayerSpec,
}

impl LayerSet {
    /// Heatmap first so circles draw on top.
    pub fn iter(&self) -> impl Iterator<Item = &LayerSpec> {
        [&self.heatmap, &self.circle].into_iter()
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        self.iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }
}
