//! Geographic point type.

use serde::{Deserialize, Serialize};

/// A geographic location in WGS84 degrees.
///
/// Longitude is not normalized here; callers that work across the
/// antimeridian may normalize modulo 360 as needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees (east positive).
    pub lon: f64,
    /// Latitude in degrees (north positive).
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude in degrees.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lon, self.lat)
    }
}
