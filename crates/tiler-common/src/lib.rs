//! Shared types for the satellite triplet tiling workspace.
//!
//! Leaf types with no heavy dependencies:
//! - [`GeoPoint`] - a longitude/latitude pair in degrees
//! - [`BoundingBox`] - a geographic sampling region
//! - [`ChannelGrid`] - a 2-D channel array with native coordinate axes

pub mod bbox;
pub mod geo;
pub mod grid;

pub use bbox::{BoundingBox, BoundingBoxError};
pub use geo::GeoPoint;
pub use grid::{ChannelGrid, GridError};
