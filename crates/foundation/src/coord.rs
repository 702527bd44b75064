use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bounds::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    #[error("{axis} is not finite")]
    NonFinite { axis: &'static str },
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.lon.is_finite() {
            return Err(CoordinateError::NonFinite { axis: "longitude" });
        }
        if !self.lat.is_finite() {
            return Err(CoordinateError::NonFinite { axis: "latitude" });
        }
        if !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(CoordinateError::LongitudeOutOfRange(self.lon));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(CoordinateError::LatitudeOutOfRange(self.lat));
        }
        Ok(())
    }

    /// GeoJSON coordinate order.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}
