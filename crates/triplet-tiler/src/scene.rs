//! Scene and channel types.
//!
//! A [`Scene`] is a multi-channel snapshot from one acquisition time,
//! supplied by an external provider. The engine only borrows read access to
//! a scene while cutting tiles from it.

use projection::Geostationary;
use tiler_common::ChannelGrid;

/// One satellite channel: a sample grid plus the projection that maps its
/// native coordinates to lon/lat.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Channel identifier, e.g. "C01".
    pub channel_id: String,
    /// The sample grid with native coordinate axes.
    pub grid: ChannelGrid,
    /// Forward map projection of the grid. Channels without one cannot be
    /// resampled.
    pub projection: Option<Geostationary>,
}

impl Channel {
    /// Create a channel with a known projection.
    pub fn new(channel_id: impl Into<String>, grid: ChannelGrid, projection: Geostationary) -> Self {
        Self {
            channel_id: channel_id.into(),
            grid,
            projection: Some(projection),
        }
    }
}

/// An ordered collection of channels sharing one acquisition, tagged with
/// the provenance of the source file (e.g. an object-storage key).
#[derive(Debug, Clone)]
pub struct Scene {
    /// Channels in composite order (conventionally red, green, blue).
    pub channels: Vec<Channel>,
    /// Source identifier recorded in triplet metadata.
    pub provenance: String,
}

impl Scene {
    /// Create a scene from channels and a provenance identifier.
    pub fn new(channels: Vec<Channel>, provenance: impl Into<String>) -> Self {
        Self {
            channels,
            provenance: provenance.into(),
        }
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiler_common::ChannelGrid;

    #[test]
    fn test_scene_holds_ordered_channels() {
        let grid =
            ChannelGrid::new(vec![0.0; 4], vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let scene = Scene::new(
            vec![
                Channel::new("C01", grid.clone(), Geostationary::goes_east_full_disk()),
                Channel::new("C02", grid.clone(), Geostationary::goes_east_full_disk()),
                Channel::new("C03", grid, Geostationary::goes_east_full_disk()),
            ],
            "s3://bucket/scene.nc",
        );
        assert_eq!(scene.num_channels(), 3);
        assert_eq!(scene.channels[1].channel_id, "C02");
        assert_eq!(scene.provenance, "s3://bucket/scene.nc");
    }
}
