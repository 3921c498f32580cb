//! Configuration for triplet generation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tiler_common::BoundingBox;

use crate::error::{Result, TilerError};
use crate::regrid::InterpolationMethod;
use crate::sampler::SamplerParams;

/// Configuration of one triplet-generation run.
///
/// Validated once, before any job is dispatched; all fields are plain data
/// so callers (CLIs, notebooks, services) can construct and serialize it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripletConfig {
    /// Geographic region tiles are sampled from.
    pub bbox: BoundingBox,

    /// Tile side length in meters.
    pub tile_size_m: f64,

    /// Resample grid resolution per tile (n x n).
    pub tile_grid_n: usize,

    /// Number of triplets to generate.
    pub num_triplets: usize,

    /// Neighbor displacement scale, in tile sizes.
    pub neighbor_scale: f64,

    /// Distant displacement scale, in tile sizes (same-scene mode).
    pub distant_scale: f64,

    /// Draw the distant tile from the anchor's scene instead of a second
    /// scene.
    pub same_scene_distant: bool,

    /// Attempt budget for rejection sampling of the distant location.
    pub max_sample_attempts: u32,

    /// Interpolation method for resampling.
    pub interpolation: InterpolationMethod,

    /// Crop padding as a fraction of the tile extent on each side.
    pub crop_pad_pct: f64,

    /// Worker threads; 1 runs jobs sequentially in the calling thread.
    pub workers: usize,

    /// Base RNG seed; job `n` uses `seed + n`, making runs reproducible.
    pub seed: u64,

    /// Directory images and metadata are written to.
    pub output_dir: PathBuf,
}

impl Default for TripletConfig {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            tile_size_m: 256_000.0,
            tile_grid_n: 256,
            num_triplets: 1,
            neighbor_scale: 0.5,
            distant_scale: 10.0,
            same_scene_distant: false,
            max_sample_attempts: 1000,
            interpolation: InterpolationMethod::Bilinear,
            crop_pad_pct: crate::resample::DEFAULT_CROP_PAD,
            workers: 1,
            seed: 0,
            output_dir: PathBuf::from("tiles"),
        }
    }
}

impl TripletConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.bbox.validate()?;

        if !(self.tile_size_m > 0.0) {
            return Err(TilerError::Configuration(format!(
                "tile_size_m must be positive, got {}",
                self.tile_size_m
            )));
        }
        if self.tile_grid_n < 2 {
            return Err(TilerError::Configuration(format!(
                "tile_grid_n must be at least 2, got {}",
                self.tile_grid_n
            )));
        }
        if self.num_triplets == 0 {
            return Err(TilerError::Configuration(
                "num_triplets must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(TilerError::Configuration(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.crop_pad_pct < 0.0 {
            return Err(TilerError::Configuration(format!(
                "crop_pad_pct must not be negative, got {}",
                self.crop_pad_pct
            )));
        }
        if self.max_sample_attempts == 0 {
            return Err(TilerError::Configuration(
                "max_sample_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The sampler parameters implied by this configuration.
    pub fn sampler_params(&self) -> SamplerParams {
        SamplerParams {
            neighbor_scale: self.neighbor_scale,
            distant_scale: self.distant_scale,
            same_scene_distant: self.same_scene_distant,
            max_attempts: self.max_sample_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TripletConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut c = TripletConfig::default();
        c.tile_size_m = 0.0;
        assert!(c.validate().is_err());

        let mut c = TripletConfig::default();
        c.tile_grid_n = 1;
        assert!(c.validate().is_err());

        let mut c = TripletConfig::default();
        c.workers = 0;
        assert!(c.validate().is_err());

        let mut c = TripletConfig::default();
        c.bbox = BoundingBox::new(10.0, 0.0, -10.0, 1.0);
        assert!(c.validate().is_err());
    }
}
