//! Crop, resample and composite channels onto tile grids.

use image::RgbImage;
#[cfg(test)]
use tiler_common::ChannelGrid;

use crate::error::{Result, TilerError};
use crate::regrid::{InterpolationMethod, Regridder};
use crate::scene::Channel;
use crate::tile::Tile;

/// Default crop padding as a fraction of the tile extent on each side.
pub const DEFAULT_CROP_PAD: f64 = 0.1;

/// Crop a channel to a padded native-coordinate box around a tile.
///
/// The tile's four corners are projected into the channel's native
/// coordinates; their min/max extent, padded by `pad_pct` of the extent on
/// each side, selects the slice. Source axes stored in descending order are
/// detected and sliced accordingly - index direction is derived from the
/// coordinate values, never assumed.
pub fn crop(channel: &Channel, tile: &Tile, pad_pct: f64) -> Result<Channel> {
    let proj = channel
        .projection
        .as_ref()
        .ok_or_else(|| TilerError::MissingProjection {
            channel: channel.channel_id.clone(),
        })?;

    let corners: Vec<(f64, f64)> = tile
        .bounds()
        .iter()
        .filter_map(|c| proj.geo_to_native(c.lon, c.lat))
        .collect();
    if corners.is_empty() {
        return Err(TilerError::EmptyCrop(format!(
            "tile at {} is not visible from the satellite",
            tile.center
        )));
    }

    let mut x_min = f64::MAX;
    let mut x_max = f64::MIN;
    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    for &(x, y) in &corners {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let lx = x_max - x_min;
    let ly = y_max - y_min;
    x_min -= pad_pct * lx;
    x_max += pad_pct * lx;
    y_min -= pad_pct * ly;
    y_max += pad_pct * ly;

    let src = &channel.grid;
    let col_range = axis_index_range(&src.x, x_min, x_max);
    let row_range = axis_index_range(&src.y, y_min, y_max);

    let (col_range, row_range) = match (col_range, row_range) {
        (Some(c), Some(r)) => (c, r),
        _ => {
            return Err(TilerError::EmptyCrop(format!(
                "tile at {} falls outside the scene extent",
                tile.center
            )))
        }
    };

    Ok(Channel {
        channel_id: channel.channel_id.clone(),
        grid: src.slice(col_range, row_range)?,
        projection: channel.projection.clone(),
    })
}

/// Indices of a monotonic axis whose coordinates lie in `[min, max]`.
/// Works for ascending and descending axes; `None` when no index matches.
fn axis_index_range(axis: &[f64], min: f64, max: f64) -> Option<std::ops::Range<usize>> {
    let inside = |v: f64| v >= min && v <= max;

    let start = axis.iter().position(|&v| inside(v))?;
    let end = axis.len() - axis.iter().rev().position(|&v| inside(v))?;
    Some(start..end)
}

/// Resample a channel onto an n x n tile grid.
///
/// Requires the channel to carry a projection; crops first, then delegates
/// interpolation to the regridder. Values are returned in the tile grid's
/// row-major order (south-to-north rows).
pub fn resample(
    channel: &Channel,
    tile: &Tile,
    n: usize,
    method: InterpolationMethod,
    crop_pad_pct: f64,
    regridder: &dyn Regridder,
) -> Result<Vec<f32>> {
    let cropped = crop(channel, tile, crop_pad_pct)?;
    let grid = tile.grid(n)?;
    regridder.regrid(&cropped, tile, &grid, method)
}

/// Compose three resampled channels into a true-color-like RGB image.
///
/// Channel order is red, green, blue. Each channel is stretched
/// independently to its own min/max (radiometrically faithful scaling is the
/// image consumer's concern); NaN samples render black. Rows are flipped so
/// north is at the top of the image.
pub fn compose_image(channels: &[Vec<f32>; 3], n: usize) -> Result<RgbImage> {
    let expected = n * n;
    for ch in channels {
        if ch.len() != expected {
            return Err(TilerError::ChannelShapeMismatch {
                expected,
                actual: ch.len(),
            });
        }
    }

    let stretched: Vec<Vec<u8>> = channels.iter().map(|ch| stretch_to_u8(ch)).collect();

    let mut img = RgbImage::new(n as u32, n as u32);
    for (row, col, px) in img.enumerate_pixels_mut().map(|(x, y, p)| (y, x, p)) {
        // Grid row 0 is the southern edge; image row 0 is the top.
        let grid_row = n - 1 - row as usize;
        let i = grid_row * n + col as usize;
        *px = image::Rgb([stretched[0][i], stretched[1][i], stretched[2][i]]);
    }
    Ok(img)
}

/// Linear min/max stretch to the u8 range, mapping NaN to 0.
fn stretch_to_u8(values: &[f32]) -> Vec<u8> {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }

    let range = if max > min { max - min } else { 1.0 };
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                0
            } else {
                (((v - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8
            }
        })
        .collect()
}
