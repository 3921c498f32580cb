//! Triplet provenance metadata and output naming.
//!
//! Each triplet index `n` owns four files in the output directory:
//! `{n:05}_anchor.png`, `{n:05}_neighbor.png`, `{n:05}_distant.png` and
//! `{n:05}_meta.yaml`. The YAML record ties the images back to their source
//! scenes and tile locations; the index in the file names is the sole
//! idempotence key.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// The role of a tile within its triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anchor,
    Neighbor,
    Distant,
}

impl Role {
    /// All roles in output order.
    pub const ALL: [Role; 3] = [Role::Anchor, Role::Neighbor, Role::Distant];

    /// The file-name fragment of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anchor => "anchor",
            Role::Neighbor => "neighbor",
            Role::Distant => "distant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of one tile image.
pub fn image_path(dir: &Path, index: usize, role: Role) -> PathBuf {
    dir.join(format!("{index:05}_{role}.png"))
}

/// Path of one triplet metadata record.
pub fn meta_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index:05}_meta.yaml"))
}

/// Serialized tile location: center plus physical size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileMeta {
    pub lon: f64,
    pub lat: f64,
    /// Side length in meters.
    pub size: f64,
}

impl From<&Tile> for TileMeta {
    fn from(tile: &Tile) -> Self {
        Self {
            lon: tile.center.lon,
            lat: tile.center.lat,
            size: tile.size_m,
        }
    }
}

/// Provenance of the scene that supplied the anchor and neighbor tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMeta {
    pub provenance: String,
    pub anchor: TileMeta,
    pub neighbor: TileMeta,
}

/// Provenance of the scene that supplied the distant tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistantMeta {
    pub provenance: String,
    pub loc: TileMeta,
}

/// The persisted metadata record of one triplet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripletRecord {
    pub target: TargetMeta,
    pub distant: DistantMeta,
}

impl TripletRecord {
    /// Assemble a record from the three tiles and their scene provenances.
    pub fn new(
        target_provenance: impl Into<String>,
        anchor: &Tile,
        neighbor: &Tile,
        distant_provenance: impl Into<String>,
        distant: &Tile,
    ) -> Self {
        Self {
            target: TargetMeta {
                provenance: target_provenance.into(),
                anchor: anchor.into(),
                neighbor: neighbor.into(),
            },
            distant: DistantMeta {
                provenance: distant_provenance.into(),
                loc: distant.into(),
            },
        }
    }

    /// Write the record as block-style YAML (no anchors or aliases).
    pub fn write(&self, path: &Path) -> crate::error::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Read a record back from YAML.
    pub fn read(path: &Path) -> crate::error::Result<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}
