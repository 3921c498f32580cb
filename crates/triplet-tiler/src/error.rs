//! Error types for triplet tiling.

use thiserror::Error;

/// Errors that can occur while generating triplets.
#[derive(Error, Debug)]
pub enum TilerError {
    /// Invalid configuration; raised before any work is dispatched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Distinct target/distant scenes were requested but the pool is too small.
    #[error("need at least {needed} scenes for distinct target/distant selection, got {available}")]
    InsufficientScenes { needed: usize, available: usize },

    /// A channel lacks the projection metadata required for resampling.
    /// Fatal for the current job only.
    #[error("channel {channel} has no projection; cannot map pixels to lon/lat")]
    MissingProjection { channel: String },

    /// Channels destined for one composite disagree in shape.
    /// Fatal for the current job only.
    #[error("channel shape mismatch: expected {expected} samples, got {actual}")]
    ChannelShapeMismatch { expected: usize, actual: usize },

    /// Rejection sampling failed to find a contained point within the
    /// configured attempt budget.
    #[error("location sampling exhausted after {attempts} attempts; bbox and distant_scale are likely incompatible")]
    SamplingExhausted { attempts: u32 },

    /// A cropped region contains no source pixels.
    #[error("tile crop produced an empty region: {0}")]
    EmptyCrop(String),

    /// Filesystem error writing images or metadata.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// Metadata serialization error.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_yaml::Error),
}

impl From<tiler_common::GridError> for TilerError {
    fn from(err: tiler_common::GridError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<tiler_common::BoundingBoxError> for TilerError {
    fn from(err: tiler_common::BoundingBoxError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for triplet tiling operations.
pub type Result<T> = std::result::Result<T, TilerError>;
