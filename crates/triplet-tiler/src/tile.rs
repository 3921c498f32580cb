//! Tile geometry.
//!
//! A [`Tile`] is a locally-square crop of fixed physical size centered on a
//! geographic point. Its footprint is computed once in an equator-centered
//! frame - where longitude and latitude degrees span equal distances - and
//! moved to the true center with a rotated-pole rotation. The half-width in
//! degrees uses a flat-Earth-at-the-equator approximation; the resulting
//! error is an accepted trade-off of this scheme, as is the lack of special
//! handling at the poles.

use projection::RotatedPole;
use serde::{Deserialize, Serialize};
use tiler_common::GeoPoint;

use crate::error::{Result, TilerError};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A locally-square geographic tile.
///
/// Immutable once constructed; only center and size are serialized, the
/// bounding polygon and resample grid are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Center of the tile.
    pub center: GeoPoint,
    /// Side length in meters.
    pub size_m: f64,
}

impl Tile {
    /// Create a tile; the size must be positive.
    pub fn new(center: GeoPoint, size_m: f64) -> Result<Self> {
        if !(size_m > 0.0) {
            return Err(TilerError::Configuration(format!(
                "tile size must be positive, got {size_m}"
            )));
        }
        Ok(Self { center, size_m })
    }

    /// Half-width of the tile in degrees, as if centered on the equator.
    pub fn equator_half_width_deg(&self) -> f64 {
        (self.size_m / 2.0 / EARTH_RADIUS_M).asin().to_degrees()
    }

    fn rotation(&self) -> RotatedPole {
        RotatedPole::centered_on(self.center.lon, self.center.lat)
    }

    /// The four corners of the tile as a closed counterclockwise polygon,
    /// in the order SW, SE, NE, NW.
    pub fn bounds(&self) -> [GeoPoint; 4] {
        let d = self.equator_half_width_deg();
        let rot = self.rotation();

        let corner = |lon_off: f64, lat_off: f64| {
            let (lon, lat) = rot.to_true(lon_off, lat_off);
            GeoPoint::new(lon, lat)
        };

        [
            corner(-d, -d),
            corner(d, -d),
            corner(d, d),
            corner(-d, d),
        ]
    }

    /// The n x n resample grid of this tile.
    ///
    /// Rows follow the south-to-north axis, columns west-to-east; point
    /// `(row, col)` is at `points[row * n + col]`. The meter offsets span
    /// `[-size/2, size/2)` in steps of `size/n` along both axes.
    pub fn grid(&self, n: usize) -> Result<TileGrid> {
        if n < 2 {
            return Err(TilerError::Configuration(format!(
                "tile grid resolution must be at least 2, got {n}"
            )));
        }

        let d = self.equator_half_width_deg();
        let rot = self.rotation();

        // Inclusive linspace over [-d, d] along both axes.
        let step_deg = 2.0 * d / (n - 1) as f64;
        let offsets_deg: Vec<f64> = (0..n).map(|i| -d + i as f64 * step_deg).collect();

        let mut points = Vec::with_capacity(n * n);
        for &lat_off in &offsets_deg {
            for &lon_off in &offsets_deg {
                let (lon, lat) = rot.to_true(lon_off, lat_off);
                points.push(GeoPoint::new(lon, lat));
            }
        }

        let step_m = self.size_m / n as f64;
        let offsets_m: Vec<f64> = (0..n)
            .map(|i| -self.size_m / 2.0 + i as f64 * step_m)
            .collect();

        Ok(TileGrid {
            n,
            points,
            x_m: offsets_m.clone(),
            y_m: offsets_m,
        })
    }
}

/// Destination grid of a tile: lon/lat of every resample target plus the
/// regular meter offsets the targets correspond to.
#[derive(Debug, Clone)]
pub struct TileGrid {
    /// Points per axis.
    pub n: usize,
    /// Row-major lon/lat points, `n * n` long.
    pub points: Vec<GeoPoint>,
    /// Meter offsets of the columns, centered on the tile.
    pub x_m: Vec<f64>,
    /// Meter offsets of the rows, centered on the tile.
    pub y_m: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Tile {
        Tile::new(GeoPoint::new(-60.0, 20.0), 256_000.0).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_size() {
        assert!(Tile::new(GeoPoint::new(0.0, 0.0), 0.0).is_err());
        assert!(Tile::new(GeoPoint::new(0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn test_equator_half_width() {
        let t = tile();
        // asin(128000 / 6371000) in degrees, a bit over 1.15.
        let d = t.equator_half_width_deg();
        assert!((d - 1.1512).abs() < 1e-3, "half width {d}");
    }

    #[test]
    fn test_bounds_symmetric_about_center() {
        let t = tile();
        let corners = t.bounds();

        let mean_lon: f64 = corners.iter().map(|c| c.lon).sum::<f64>() / 4.0;
        let mean_lat: f64 = corners.iter().map(|c| c.lat).sum::<f64>() / 4.0;

        assert!(
            (mean_lon - t.center.lon).abs() < 1e-3,
            "corner centroid lon {mean_lon} vs center {}",
            t.center.lon
        );
        assert!(
            (mean_lat - t.center.lat).abs() < 1e-3,
            "corner centroid lat {mean_lat} vs center {}",
            t.center.lat
        );
    }

    #[test]
    fn test_bounds_order_is_sw_se_ne_nw() {
        let t = tile();
        let [sw, se, ne, nw] = t.bounds();

        assert!(sw.lat < nw.lat);
        assert!(se.lat < ne.lat);
        assert!(sw.lon < se.lon);
        assert!(nw.lon < ne.lon);
    }

    #[test]
    fn test_grid_shape_and_offsets() {
        let t = tile();
        let g = t.grid(8).unwrap();

        assert_eq!(g.points.len(), 64);
        assert_eq!(g.x_m.len(), 8);
        assert_eq!(g.y_m.len(), 8);

        // Offsets span [-size/2, size/2) with uniform step size/n.
        let step = t.size_m / 8.0;
        assert!((g.x_m[0] - (-t.size_m / 2.0)).abs() < 1e-9);
        assert!(g.x_m[7] < t.size_m / 2.0);
        for w in g.x_m.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn test_grid_rejects_n_below_two() {
        let t = tile();
        assert!(t.grid(1).is_err());
        assert!(t.grid(0).is_err());
    }

    #[test]
    fn test_grid_center_point_near_tile_center() {
        let t = tile();
        // Odd n puts a grid point exactly at the tile center.
        let g = t.grid(9).unwrap();
        let mid = g.points[4 * 9 + 4];
        assert!((mid.lon - t.center.lon).abs() < 1e-9);
        assert!((mid.lat - t.center.lat).abs() < 1e-9);
    }
}
