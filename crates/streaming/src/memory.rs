use std::sync::Arc;

use foundation::{Clock, GeoBounds, OwnerId, PointId, SystemClock};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::point::{NewPoint, Point, sort_newest_first};
use crate::store::{BoxFuture, PointStore, StoreError};

/// Process-local store. Backs tests and offline runs.
pub struct MemoryPointStore {
    points: RwLock<Vec<Point>>,
    clock: Arc<dyn Clock>,
}

impl MemoryPointStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            points: RwLock::new(Vec::new()),
            clock,
        }
    }

    /// Insert an already-complete point, bypassing id and time assignment.
    pub fn seed(&self, point: Point) {
        self.points.write().push(point);
    }

    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    pub fn query_now(&self, bounds: &GeoBounds) -> Vec<Point> {
        let mut hits: Vec<Point> = self
            .points
            .read()
            .iter()
            .filter(|p| p.within(bounds))
            .cloned()
            .collect();
        sort_newest_first(&mut hits);
        hits
    }
}

impl Default for MemoryPointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PointStore for MemoryPointStore {
    fn query_bounds(&self, bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, StoreError>> {
        Box::pin(async move {
            bounds
                .validate()
                .map_err(|e| StoreError::rejected(format!("bad bounds: {e}")))?;
            Ok(self.query_now(&bounds))
        })
    }

    fn insert(&self, point: NewPoint) -> BoxFuture<'_, Result<Point, StoreError>> {
        Box::pin(async move {
            point
                .validate()
                .map_err(|e| StoreError::rejected(format!("bad point: {e}")))?;
            let id = PointId::new(Uuid::new_v4().to_string());
            let stored = point.into_point(id, self.clock.now());
            self.points.write().push(stored.clone());
            Ok(stored)
        })
    }

    fn delete_owned(&self, owner: OwnerId) -> BoxFuture<'_, Result<u64, StoreError>> {
        Box::pin(async move {
            let mut points = self.points.write();
            let before = points.len();
            points.retain(|p| p.owner_id != owner);
            Ok((before - points.len()) as u64)
        })
    }
}
