use std::sync::Arc;

use foundation::{BoundsError, GeoBounds, TimestampMs};
use thiserror::Error;
use tracing::debug;

use crate::decay::DecayParams;
use crate::features::{FeatureCollection, RenderFeature};
use crate::point::Point;
use crate::store::{PointStore, StoreError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid bounds: {0}")]
    InvalidBounds(#[from] BoundsError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Turn stored points into render features, preserving store order.
pub fn decay_points(points: &[Point], decay: &DecayParams, now: TimestampMs) -> Vec<RenderFeature> {
    points
        .iter()
        .map(|p| RenderFeature {
            id: p.id.clone(),
            coordinates: p.position().to_array(),
            weight: decay.weight_at(p.created_at, now),
            created_at_millis: p.created_at.0,
        })
        .collect()
}

/// Bounding-box query followed by the decay transform.
///
/// Produces a complete collection or an error; never a partial result.
#[derive(Clone)]
pub struct FetchPipeline {
    store: Arc<dyn PointStore>,
    decay: DecayParams,
}

impl FetchPipeline {
    pub fn new(store: Arc<dyn PointStore>, decay: DecayParams) -> Self {
        Self { store, decay }
    }

    pub fn store(&self) -> &Arc<dyn PointStore> {
        &self.store
    }

    pub fn decay(&self) -> &DecayParams {
        &self.decay
    }

    pub async fn fetch(
        &self,
        bounds: GeoBounds,
        now: TimestampMs,
    ) -> Result<FeatureCollection, FetchError> {
        let bounds = bounds.normalized()?;
        let points = self.store.query_bounds(bounds).await?;
        debug!(count = points.len(), ?bounds, "store returned points");
        Ok(decay_points(&points, &self.decay, now).into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{FetchError, FetchPipeline, decay_points};
    use crate::decay::DecayParams;
    use crate::memory::MemoryPointStore;
    use crate::point::NewPoint;
    use foundation::{GeoBounds, LonLat, OwnerId, PointId, TimestampMs};

    fn point(id: &str, lon: f64, lat: f64, created: TimestampMs) -> crate::point::Point {
        NewPoint::new(LonLat::new(lon, lat), OwnerId::anonymous()).into_point(PointId::new(id), created)
    }

    #[test]
    fn decays_by_age() {
        let now = TimestampMs::from_days(60.0);
        let pts = vec![
            point("new", 0.0, 0.0, now),
            point("month", 1.0, 1.0, now.saturating_sub_days(30.0)),
        ];
        let out = decay_points(&pts, &DecayParams::default(), now);
        assert_eq!(out[0].weight, 5.0);
        assert!((out[1].weight - 1.8394).abs() < 1e-3);
        assert_eq!(out[1].coordinates, [1.0, 1.0]);
        assert_eq!(out[1].created_at_millis, now.saturating_sub_days(30.0).0);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_collection() {
        let pipeline = FetchPipeline::new(Arc::new(MemoryPointStore::new()), DecayParams::default());
        let fc = pipeline
            .fetch(GeoBounds::new(-118.0, 33.4, -117.6, 33.6), TimestampMs(0))
            .await
            .unwrap();
        assert!(fc.is_empty());
    }

    #[tokio::test]
    async fn identical_bounds_give_identical_collections() {
        let store = Arc::new(MemoryPointStore::new());
        let now = TimestampMs::from_days(10.0);
        for (i, age) in [0.0, 3.0, 12.0].into_iter().enumerate() {
            store.seed(point(&format!("p{i}"), -117.8, 33.5, now.saturating_sub_days(age)));
        }
        let pipeline = FetchPipeline::new(store, DecayParams::default());
        let b = GeoBounds::new(-118.0, 33.4, -117.6, 33.6);
        let a = pipeline.fetch(b, now).await.unwrap();
        let c = pipeline.fetch(b, now).await.unwrap();
        assert_eq!(a, c);
        assert_eq!(a.len(), 3);
        assert_eq!(a.features[0].properties.id, PointId::new("p0"));
    }

    #[tokio::test]
    async fn rejects_non_finite_bounds_before_querying() {
        let pipeline = FetchPipeline::new(Arc::new(MemoryPointStore::new()), DecayParams::default());
        let err = pipeline
            .fetch(GeoBounds::new(f64::NAN, 0.0, 1.0, 1.0), TimestampMs(0))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidBounds(_)));
    }
}
