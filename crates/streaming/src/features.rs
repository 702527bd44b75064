//! GeoJSON feature collection handed to the renderer's point source.

use foundation::PointId;
use serde::{Deserialize, Serialize};

/// Per-render projection of a stored point. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFeature {
    pub id: PointId,
    pub coordinates: [f64; 2],
    pub weight: f64,
    pub created_at_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Point")]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub id: PointId,
    pub weight: f64,
    pub created_at_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

impl From<RenderFeature> for Feature {
    fn from(f: RenderFeature) -> Self {
        Feature {
            geometry: PointGeometry {
                coordinates: f.coordinates,
            },
            properties: FeatureProperties {
                id: f.id,
                weight: f.weight,
                created_at_millis: f.created_at_millis,
            },
        }
    }
}

/// Always a complete collection; an empty one is still valid GeoJSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl FromIterator<RenderFeature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = RenderFeature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().map(Feature::from).collect(),
        }
    }
}
