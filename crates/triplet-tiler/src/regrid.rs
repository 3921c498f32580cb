//! Regridding: interpolating channel samples onto tile grids.
//!
//! The [`Regridder`] trait is the seam for the interpolation engine; the
//! built-in [`ProjectionRegridder`] projects every destination point through
//! the channel's forward projection into fractional source-grid indices and
//! samples there. Precomputed index mappings ("weights") can be reused
//! through a [`WeightCache`](crate::weights::WeightCache); the cache is a
//! pure optimization and never affects results.

use serde::{Deserialize, Serialize};
use tiler_common::ChannelGrid;
use tracing::debug;

use crate::error::{Result, TilerError};
use crate::scene::Channel;
use crate::tile::{Tile, TileGrid};
use crate::weights::{NoopWeightCache, WeightCache, WeightKey, Weights};

/// Interpolation method for resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Nearest source pixel (preserves exact values).
    Nearest,
    /// Bilinear blend of the four surrounding pixels.
    #[default]
    Bilinear,
}

impl InterpolationMethod {
    /// Parse from string (case-insensitive); unknown values fall back to
    /// bilinear.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            _ => Self::Bilinear,
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Interpolation engine seam.
///
/// Maps one (cropped) channel onto a tile's destination grid. Implementors
/// must be thread-safe; the driver calls them from worker threads.
pub trait Regridder: Send + Sync {
    /// Resample `channel` onto the points of `grid`, returning `n * n`
    /// values in the grid's row-major order.
    fn regrid(
        &self,
        channel: &Channel,
        tile: &Tile,
        grid: &TileGrid,
        method: InterpolationMethod,
    ) -> Result<Vec<f32>>;
}

/// Built-in regridder backed by the channel's map projection.
///
/// For each destination lon/lat, the forward projection yields native
/// coordinates, which are converted to fractional source indices using the
/// channel's coordinate axes (ascending or descending). Destination points
/// outside the source extent, or not visible to the satellite, become NaN.
pub struct ProjectionRegridder {
    cache: Box<dyn WeightCache>,
}

impl ProjectionRegridder {
    /// Regridder without weight reuse.
    pub fn new() -> Self {
        Self {
            cache: Box::new(NoopWeightCache),
        }
    }

    /// Regridder that reuses index mappings through the given cache.
    pub fn with_cache(cache: Box<dyn WeightCache>) -> Self {
        Self { cache }
    }

    /// Compute the fractional source index of every destination point.
    fn build_weights(channel: &Channel, grid: &TileGrid) -> Result<Weights> {
        let proj = channel
            .projection
            .as_ref()
            .ok_or_else(|| TilerError::MissingProjection {
                channel: channel.channel_id.clone(),
            })?;
        let src = &channel.grid;

        let mapping = grid
            .points
            .iter()
            .map(|p| {
                let (x, y) = proj.geo_to_native(p.lon, p.lat)?;
                fractional_index(src, x, y)
            })
            .collect();
        Ok(mapping)
    }
}

impl Default for ProjectionRegridder {
    fn default() -> Self {
        Self::new()
    }
}

impl Regridder for ProjectionRegridder {
    fn regrid(
        &self,
        channel: &Channel,
        tile: &Tile,
        grid: &TileGrid,
        method: InterpolationMethod,
    ) -> Result<Vec<f32>> {
        if channel.projection.is_none() {
            return Err(TilerError::MissingProjection {
                channel: channel.channel_id.clone(),
            });
        }

        let key = WeightKey::new(method, channel.grid.shape(), grid.n, tile);
        let weights = self
            .cache
            .get_or_build(&key, &|| Self::build_weights(channel, grid))?;
        debug!(key = %key.file_stem(), "regridding {} points", grid.points.len());

        let src = &channel.grid;
        let out = weights
            .iter()
            .map(|idx| match idx {
                Some((col, row)) => match method {
                    InterpolationMethod::Nearest => nearest_sample(src, *col, *row),
                    InterpolationMethod::Bilinear => bilinear_sample(src, *col, *row),
                },
                None => f32::NAN,
            })
            .collect();
        Ok(out)
    }
}

/// Convert native coordinates to a fractional (col, row) index, assuming
/// evenly spaced axes. Handles axes stored in either direction; returns
/// `None` outside the grid.
fn fractional_index(src: &ChannelGrid, x: f64, y: f64) -> Option<(f64, f64)> {
    let dx = (src.x[src.nx - 1] - src.x[0]) / (src.nx - 1) as f64;
    let dy = (src.y[src.ny - 1] - src.y[0]) / (src.ny - 1) as f64;

    let col = (x - src.x[0]) / dx;
    let row = (y - src.y[0]) / dy;

    if col < 0.0 || col > (src.nx - 1) as f64 || row < 0.0 || row > (src.ny - 1) as f64 {
        return None;
    }
    Some((col, row))
}

/// Value of the source pixel nearest to a fractional index.
fn nearest_sample(src: &ChannelGrid, col: f64, row: f64) -> f32 {
    let c = col.round() as usize;
    let r = row.round() as usize;
    src.get(c, r).unwrap_or(f32::NAN)
}

/// Bilinear blend of the four pixels surrounding a fractional index.
/// NaN in any corner propagates to the result.
fn bilinear_sample(src: &ChannelGrid, col: f64, row: f64) -> f32 {
    let c0 = col.floor() as usize;
    let r0 = row.floor() as usize;
    let c1 = (c0 + 1).min(src.nx - 1);
    let r1 = (r0 + 1).min(src.ny - 1);

    if c0 >= src.nx || r0 >= src.ny {
        return f32::NAN;
    }

    let cf = (col - c0 as f64) as f32;
    let rf = (row - r0 as f64) as f32;

    let v00 = src.data[r0 * src.nx + c0];
    let v10 = src.data[r0 * src.nx + c1];
    let v01 = src.data[r1 * src.nx + c0];
    let v11 = src.data[r1 * src.nx + c1];

    if v00.is_nan() || v10.is_nan() || v01.is_nan() || v11.is_nan() {
        return f32::NAN;
    }

    let top = v00 * (1.0 - cf) + v10 * cf;
    let bottom = v01 * (1.0 - cf) + v11 * cf;
    top * (1.0 - rf) + bottom * rf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x3() -> ChannelGrid {
        let data: Vec<f32> = (0..9).map(|i| i as f32).collect();
        ChannelGrid::new(data, vec![0.0, 10.0, 20.0], vec![0.0, 10.0, 20.0]).unwrap()
    }

    #[test]
    fn test_fractional_index_ascending() {
        let g = grid_3x3();
        assert_eq!(fractional_index(&g, 0.0, 0.0), Some((0.0, 0.0)));
        assert_eq!(fractional_index(&g, 15.0, 5.0), Some((1.5, 0.5)));
        assert_eq!(fractional_index(&g, 25.0, 0.0), None);
        assert_eq!(fractional_index(&g, -1.0, 0.0), None);
    }

    #[test]
    fn test_fractional_index_descending() {
        let data: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let g = ChannelGrid::new(data, vec![20.0, 10.0, 0.0], vec![20.0, 10.0, 0.0]).unwrap();
        // Coordinate 20 is at index 0 when the axis is descending.
        assert_eq!(fractional_index(&g, 20.0, 20.0), Some((0.0, 0.0)));
        assert_eq!(fractional_index(&g, 5.0, 10.0), Some((1.5, 1.0)));
        assert_eq!(fractional_index(&g, 25.0, 10.0), None);
    }

    #[test]
    fn test_nearest_sample() {
        let g = grid_3x3();
        assert_eq!(nearest_sample(&g, 0.0, 0.0), 0.0);
        assert_eq!(nearest_sample(&g, 1.4, 1.4), 4.0);
        assert_eq!(nearest_sample(&g, 1.6, 1.6), 8.0);
    }

    #[test]
    fn test_bilinear_sample() {
        let g = grid_3x3();
        assert_eq!(bilinear_sample(&g, 0.0, 0.0), 0.0);
        assert_eq!(bilinear_sample(&g, 2.0, 2.0), 8.0);
        let mid = bilinear_sample(&g, 0.5, 0.5);
        assert!((mid - 2.0).abs() < 1e-6, "center of 0,1,3,4 is 2.0, got {mid}");
    }

    #[test]
    fn test_bilinear_nan_corner_propagates() {
        let mut data: Vec<f32> = (0..9).map(|i| i as f32).collect();
        data[4] = f32::NAN;
        let g = ChannelGrid::new(data, vec![0.0, 10.0, 20.0], vec![0.0, 10.0, 20.0]).unwrap();
        assert!(bilinear_sample(&g, 0.5, 0.5).is_nan());
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(InterpolationMethod::parse("NEAREST"), InterpolationMethod::Nearest);
        assert_eq!(InterpolationMethod::parse("bilinear"), InterpolationMethod::Bilinear);
        assert_eq!(InterpolationMethod::parse("other"), InterpolationMethod::Bilinear);
    }
}
