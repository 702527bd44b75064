use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundsError {
    #[error("bounds edge {edge} is not finite")]
    NonFinite { edge: &'static str },
    #[error("west ({west}) is greater than east ({east})")]
    InvertedLongitude { west: f64, east: f64 },
    #[error("south ({south}) is greater than north ({north})")]
    InvertedLatitude { south: f64, north: f64 },
}

/// Axis-aligned lon/lat rectangle in decimal degrees.
///
/// The antimeridian is not modelled: a valid box always has `west <= east`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub const fn world() -> Self {
        Self::new(MIN_LON, MIN_LAT, MAX_LON, MAX_LAT)
    }

    /// Checks that every edge is finite and that the box is not inverted.
    pub fn validate(&self) -> Result<(), BoundsError> {
        for (edge, v) in [
            ("west", self.west),
            ("south", self.south),
            ("east", self.east),
            ("north", self.north),
        ] {
            if !v.is_finite() {
                return Err(BoundsError::NonFinite { edge });
            }
        }
        if self.west > self.east {
            return Err(BoundsError::InvertedLongitude {
                west: self.west,
                east: self.east,
            });
        }
        if self.south > self.north {
            return Err(BoundsError::InvertedLatitude {
                south: self.south,
                north: self.north,
            });
        }
        Ok(())
    }

    /// Clamp every edge into the world range.
    ///
    /// Map renderers report longitudes past +-180 when several world copies are
    /// visible; the store only knows the canonical range.
    pub fn clamped(&self) -> Self {
        Self {
            west: self.west.clamp(MIN_LON, MAX_LON),
            south: self.south.clamp(MIN_LAT, MAX_LAT),
            east: self.east.clamp(MIN_LON, MAX_LON),
            north: self.north.clamp(MIN_LAT, MAX_LAT),
        }
    }

    /// Validate, then clamp. This is the form handed to the store.
    pub fn normalized(&self) -> Result<Self, BoundsError> {
        self.validate()?;
        Ok(self.clamped())
    }

    /// Equality within `threshold` degrees on each of the four edges.
    pub fn approx_eq(&self, other: &GeoBounds, threshold: f64) -> bool {
        (self.west - other.west).abs() < threshold
            && (self.south - other.south).abs() < threshold
            && (self.east - other.east).abs() < threshold
            && (self.north - other.north).abs() < threshold
    }

    /// Inclusive containment test.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}
