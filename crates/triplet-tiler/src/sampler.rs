//! Triplet location sampling.
//!
//! Draws the three tile centers of a triplet: the anchor uniformly inside
//! the sampling region, the neighbor as a small random displacement of the
//! anchor, and the distant point either far from the anchor in the same
//! scene (rejection-sampled back into the region) or uniformly anywhere in
//! the region when a second scene provides it.
//!
//! Displacement radii are scaled by an approximate 100 km-per-degree
//! conversion of the tile size; this is deliberately not a geodesic
//! computation.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tiler_common::{BoundingBox, GeoPoint};

use crate::error::{Result, TilerError};

/// Approximate meters per degree used to express tile size as an angular
/// displacement scale.
const METERS_PER_DEGREE: f64 = 100_000.0;

/// Relative standard deviation of the displacement radius.
const RADIUS_JITTER_STD: f64 = 0.1;

/// The three sampled tile centers of one triplet.
#[derive(Debug, Clone, Copy)]
pub struct TripletLocations {
    pub anchor: GeoPoint,
    pub neighbor: GeoPoint,
    pub distant: GeoPoint,
}

/// Sampling parameters shared by every triplet of a run.
#[derive(Debug, Clone, Copy)]
pub struct SamplerParams {
    /// Displacement scale for the neighbor, in tile sizes.
    pub neighbor_scale: f64,
    /// Displacement scale for the distant point, in tile sizes
    /// (same-scene mode only).
    pub distant_scale: f64,
    /// When true the distant tile comes from the same scene as the anchor
    /// and is rejection-sampled to stay inside the region; when false it is
    /// drawn uniformly and independently.
    pub same_scene_distant: bool,
    /// Attempt budget for rejection sampling.
    pub max_attempts: u32,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            neighbor_scale: 0.5,
            distant_scale: 10.0,
            same_scene_distant: false,
            max_attempts: 1000,
        }
    }
}

/// Draw one (anchor, neighbor, distant) location triple.
///
/// The neighbor is deliberately not re-validated against the region: small
/// displacements land inside almost always, and consumers that need strict
/// containment can filter on the recorded coordinates.
pub fn sample_triplet<R: Rng + ?Sized>(
    rng: &mut R,
    bbox: &BoundingBox,
    tile_size_m: f64,
    params: &SamplerParams,
) -> Result<TripletLocations> {
    let tile_size_deg = tile_size_m / METERS_PER_DEGREE;

    let anchor = uniform_in(rng, bbox);
    let neighbor = perturb(rng, anchor, params.neighbor_scale * tile_size_deg);

    let distant = if params.same_scene_distant {
        sample_contained(rng, bbox, anchor, params.distant_scale * tile_size_deg, params.max_attempts)?
    } else {
        uniform_in(rng, bbox)
    };

    Ok(TripletLocations {
        anchor,
        neighbor,
        distant,
    })
}

/// Uniform draw over the bounding box.
fn uniform_in<R: Rng + ?Sized>(rng: &mut R, bbox: &BoundingBox) -> GeoPoint {
    let lon = bbox.min_lon + bbox.width() * rng.gen::<f64>();
    let lat = bbox.min_lat + bbox.height() * rng.gen::<f64>();
    GeoPoint::new(lon, lat)
}

/// Displace a point by a random bearing and a jittered radius.
fn perturb<R: Rng + ?Sized>(rng: &mut R, loc: GeoPoint, radius_deg: f64) -> GeoPoint {
    let theta = rng.gen::<f64>() * std::f64::consts::TAU;
    // Mean 1.0 with 10% jitter; std is a fixed constant so the distribution
    // is always valid.
    let normal = Normal::new(1.0, RADIUS_JITTER_STD).expect("valid normal parameters");
    let r = radius_deg * normal.sample(rng);

    GeoPoint::new(loc.lon + r * theta.cos(), loc.lat + r * theta.sin())
}

/// Perturb until the result lands inside the region, up to `max_attempts`.
fn sample_contained<R: Rng + ?Sized>(
    rng: &mut R,
    bbox: &BoundingBox,
    origin: GeoPoint,
    radius_deg: f64,
    max_attempts: u32,
) -> Result<GeoPoint> {
    for _ in 0..max_attempts {
        let candidate = perturb(rng, origin, radius_deg);
        if bbox.contains(candidate.lon, candidate.lat) {
            return Ok(candidate);
        }
    }
    Err(TilerError::SamplingExhausted {
        attempts: max_attempts,
    })
}
