//! Parallel, idempotent triplet generation.
//!
//! Every triplet index is an independent job: it reads only shared
//! immutable scene data and writes only to paths derived from its own
//! index, so jobs run on a worker pool without locks. A job whose three
//! output images already exist is skipped - re-running a partially
//! completed batch finishes only the missing triplets.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::TripletConfig;
use crate::error::{Result, TilerError};
use crate::metadata::{image_path, meta_path, Role, TripletRecord};
use crate::regrid::{ProjectionRegridder, Regridder};
use crate::resample::{compose_image, resample};
use crate::sampler::sample_triplet;
use crate::scene::Scene;
use crate::tile::Tile;

/// Number of channels composed into each tile image.
const COMPOSITE_CHANNELS: usize = 3;

/// Outcome counts of one driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Jobs that produced new outputs.
    pub generated: usize,
    /// Jobs skipped because their outputs already existed.
    pub skipped: usize,
}

enum JobOutcome {
    Generated,
    Skipped,
}

/// Orchestrates triplet-generation jobs over a scene pool.
pub struct TripletDriver {
    config: TripletConfig,
    regridder: Arc<dyn Regridder>,
}

impl TripletDriver {
    /// Create a driver with the built-in projection regridder.
    pub fn new(config: TripletConfig) -> Result<Self> {
        Self::with_regridder(config, Arc::new(ProjectionRegridder::new()))
    }

    /// Create a driver with a caller-supplied interpolation engine.
    pub fn with_regridder(config: TripletConfig, regridder: Arc<dyn Regridder>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, regridder })
    }

    /// Generate all configured triplets from the given scene pool.
    ///
    /// Preconditions are checked once, before any job is dispatched. Jobs
    /// then run to completion in any order - one job's failure does not
    /// cancel its siblings - and the first error (in job order) is returned
    /// after the batch drains.
    pub fn run(&self, scenes: &[Scene]) -> Result<RunSummary> {
        self.check_scene_pool(scenes)?;
        std::fs::create_dir_all(&self.config.output_dir)?;

        info!(
            triplets = self.config.num_triplets,
            workers = self.config.workers,
            scenes = scenes.len(),
            "generating triplets"
        );

        let results: Vec<Result<JobOutcome>> = if self.config.workers == 1 {
            (0..self.config.num_triplets)
                .map(|n| self.run_job(n, scenes))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers)
                .build()
                .map_err(|e| TilerError::Configuration(e.to_string()))?;
            pool.install(|| {
                (0..self.config.num_triplets)
                    .into_par_iter()
                    .map(|n| self.run_job(n, scenes))
                    .collect()
            })
        };

        let mut summary = RunSummary {
            generated: 0,
            skipped: 0,
        };
        let mut first_error = None;
        for (n, result) in results.into_iter().enumerate() {
            match result {
                Ok(JobOutcome::Generated) => summary.generated += 1,
                Ok(JobOutcome::Skipped) => summary.skipped += 1,
                Err(err) => {
                    warn!(index = n, error = %err, "triplet job failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!(
                    generated = summary.generated,
                    skipped = summary.skipped,
                    "triplet run complete"
                );
                Ok(summary)
            }
        }
    }

    /// Collection-level preconditions, checked once per run.
    fn check_scene_pool(&self, scenes: &[Scene]) -> Result<()> {
        if scenes.is_empty() {
            return Err(TilerError::Configuration(
                "at least one scene is required".to_string(),
            ));
        }
        if !self.config.same_scene_distant && scenes.len() < 2 {
            return Err(TilerError::InsufficientScenes {
                needed: 2,
                available: scenes.len(),
            });
        }
        for scene in scenes {
            if scene.num_channels() < COMPOSITE_CHANNELS {
                return Err(TilerError::Configuration(format!(
                    "scene {} has {} channels; composites need {}",
                    scene.provenance,
                    scene.num_channels(),
                    COMPOSITE_CHANNELS
                )));
            }
        }
        Ok(())
    }

    /// Run one triplet job end to end.
    fn run_job(&self, index: usize, scenes: &[Scene]) -> Result<JobOutcome> {
        let cfg = &self.config;
        let dir = &cfg.output_dir;

        let all_exist = Role::ALL
            .iter()
            .all(|role| image_path(dir, index, *role).exists());
        if all_exist {
            debug!(index, "outputs exist, skipping");
            return Ok(JobOutcome::Skipped);
        }

        // Deterministic per-job seed: concurrent workers never share RNG
        // state and a re-run reproduces the same draws.
        let mut rng = StdRng::seed_from_u64(cfg.seed.wrapping_add(index as u64));

        let (target_scene, distant_scene) = self.select_scenes(&mut rng, scenes);

        let locs = sample_triplet(&mut rng, &cfg.bbox, cfg.tile_size_m, &cfg.sampler_params())?;

        let anchor = Tile::new(locs.anchor, cfg.tile_size_m)?;
        let neighbor = Tile::new(locs.neighbor, cfg.tile_size_m)?;
        let distant = Tile::new(locs.distant, cfg.tile_size_m)?;

        let assignments = [
            (Role::Anchor, &anchor, target_scene),
            (Role::Neighbor, &neighbor, target_scene),
            (Role::Distant, &distant, distant_scene),
        ];

        for (role, tile, scene) in assignments {
            let band = |i: usize| {
                resample(
                    &scene.channels[i],
                    tile,
                    cfg.tile_grid_n,
                    cfg.interpolation,
                    cfg.crop_pad_pct,
                    self.regridder.as_ref(),
                )
            };
            let bands = [band(0)?, band(1)?, band(2)?];
            let img = compose_image(&bands, cfg.tile_grid_n)?;
            img.save(image_path(dir, index, role))?;
        }

        let record = TripletRecord::new(
            &target_scene.provenance,
            &anchor,
            &neighbor,
            &distant_scene.provenance,
            &distant,
        );
        record.write(&meta_path(dir, index))?;

        debug!(index, "triplet written");
        Ok(JobOutcome::Generated)
    }

    /// Pick the target and distant scenes for one job.
    ///
    /// With a pool of two or more and distinct scenes requested, the pair is
    /// drawn without replacement; in same-scene mode a single scene serves
    /// both roles.
    fn select_scenes<'s>(&self, rng: &mut StdRng, scenes: &'s [Scene]) -> (&'s Scene, &'s Scene) {
        if self.config.same_scene_distant || scenes.len() < 2 {
            let idx = rng.gen_range(0..scenes.len());
            (&scenes[idx], &scenes[idx])
        } else {
            let picks = rand::seq::index::sample(rng, scenes.len(), 2);
            (&scenes[picks.index(0)], &scenes[picks.index(1)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiler_common::BoundingBox;

    fn config() -> TripletConfig {
        TripletConfig {
            bbox: BoundingBox::new(-70.0, 10.0, -50.0, 30.0),
            ..TripletConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut cfg = config();
        cfg.tile_grid_n = 0;
        assert!(TripletDriver::new(cfg).is_err());
    }

    #[test]
    fn test_empty_pool_fails_fast() {
        let driver = TripletDriver::new(config()).unwrap();
        assert!(matches!(
            driver.run(&[]),
            Err(TilerError::Configuration(_))
        ));
    }

    #[test]
    fn test_single_scene_requires_same_scene_mode() {
        let driver = TripletDriver::new(config()).unwrap();
        let scene = Scene::new(vec![], "only-one");
        // Pool precondition fires before the channel-count check.
        assert!(matches!(
            driver.run(&[scene]),
            Err(TilerError::InsufficientScenes {
                needed: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_scene_needs_three_channels() {
        let mut cfg = config();
        cfg.same_scene_distant = true;
        let driver = TripletDriver::new(cfg).unwrap();
        let scene = Scene::new(vec![], "no-channels");
        assert!(matches!(
            driver.run(&[scene]),
            Err(TilerError::Configuration(_))
        ));
    }
}
