//! Bounding box type and operations.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 degrees.
///
/// Used as the sampling region for tile locations. Containment is a closed
/// check: points exactly on an edge count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Create a bounding box from its SW and NE corners.
    pub fn from_corners(sw: GeoPoint, ne: GeoPoint) -> Self {
        Self::new(sw.lon, sw.lat, ne.lon, ne.lat)
    }

    /// Check that min <= max along both axes.
    pub fn validate(&self) -> Result<(), BoundingBoxError> {
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(BoundingBoxError::InvertedBounds {
                min_lon: self.min_lon,
                min_lat: self.min_lat,
                max_lon: self.max_lon,
                max_lat: self.max_lat,
            });
        }
        Ok(())
    }

    /// Width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check if a point is contained within this box (closed intervals).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Get the center point of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoundingBoxError {
    #[error(
        "inverted bounding box: ({min_lon}, {min_lat}) - ({max_lon}, {max_lat}); \
         min must not exceed max"
    )]
    InvertedBounds {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },
}
