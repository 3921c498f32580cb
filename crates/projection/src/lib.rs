//! Map projections for satellite tiling.
//!
//! - [`Geostationary`] - the native projection of full-disk satellite
//!   imagery, between geographic coordinates and scan-angle meters
//! - [`RotatedPole`] - the spherical rotation used to center locally-square
//!   tiles anywhere on the globe

pub mod geostationary;
pub mod rotated_pole;

pub use geostationary::Geostationary;
pub use rotated_pole::RotatedPole;
