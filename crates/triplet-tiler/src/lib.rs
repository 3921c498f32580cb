//! Self-supervised triplet tiling for geostationary satellite imagery.
//!
//! Prepares (anchor, neighbor, distant) training triplets for
//! representation-learning models. Given one or more full-disk multi-channel
//! scenes and a geographic sampling region, the driver repeatedly:
//!
//! 1. samples three tile locations with a defined spatial relationship
//!    (anchor uniform in the region, neighbor a small perturbation of the
//!    anchor, distant either far away in the same scene or anywhere in a
//!    second scene),
//! 2. builds a locally-square [`Tile`] around each location,
//! 3. crops and resamples the scene channels onto the tile grid,
//! 4. composes a true-color-like PNG per tile and writes one YAML
//!    provenance record per triplet.
//!
//! Jobs are independent and idempotent (keyed by triplet index), so the
//! driver parallelizes them across a worker pool without locks.
//!
//! # Example
//!
//! ```ignore
//! use triplet_tiler::{TripletConfig, TripletDriver};
//! use tiler_common::BoundingBox;
//!
//! let config = TripletConfig {
//!     bbox: BoundingBox::new(-70.0, 10.0, -50.0, 30.0),
//!     tile_size_m: 256_000.0,
//!     num_triplets: 100,
//!     output_dir: "tiles/out".into(),
//!     ..TripletConfig::default()
//! };
//! let driver = TripletDriver::new(config)?;
//! driver.run(&scenes)?;
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod metadata;
pub mod regrid;
pub mod resample;
pub mod sampler;
pub mod scene;
pub mod tile;
pub mod weights;
pub mod zenith;

pub use config::TripletConfig;
pub use driver::{RunSummary, TripletDriver};
pub use error::{Result, TilerError};
pub use metadata::{Role, TileMeta, TripletRecord};
pub use regrid::{InterpolationMethod, ProjectionRegridder, Regridder};
pub use resample::{compose_image, crop, resample};
pub use sampler::{sample_triplet, SamplerParams, TripletLocations};
pub use scene::{Channel, Scene};
pub use tile::{Tile, TileGrid};
pub use weights::{DirWeightCache, NoopWeightCache, WeightCache, WeightKey};
