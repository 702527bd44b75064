use foundation::{CoordinateError, GeoBounds, LonLat, OwnerId, PointId, TimestampMs};
use serde::{Deserialize, Serialize};

/// A stored sighting. Immutable once the store has assigned `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub longitude: f64,
    pub latitude: f64,
    pub created_at: TimestampMs,
    pub owner_id: OwnerId,
}

impl Point {
    pub fn position(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }

    pub fn within(&self, bounds: &GeoBounds) -> bool {
        bounds.contains(self.longitude, self.latitude)
    }
}

/// Insert request. The store fills in the id and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub owner_id: OwnerId,
}

impl NewPoint {
    pub fn new(position: LonLat, owner_id: OwnerId) -> Self {
        Self {
            longitude: position.lon,
            latitude: position.lat,
            owner_id,
        }
    }

    pub fn validate(&self) -> Result<(), CoordinateError> {
        LonLat::new(self.longitude, self.latitude).validate()
    }

    pub fn into_point(self, id: PointId, created_at: TimestampMs) -> Point {
        Point {
            id,
            longitude: self.longitude,
            latitude: self.latitude,
            created_at,
            owner_id: self.owner_id,
        }
    }
}

/// Most recent first. Stable, so equal timestamps keep store order.
pub fn sort_newest_first(points: &mut [Point]) {
    points.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
