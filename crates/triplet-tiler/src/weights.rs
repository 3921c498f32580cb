//! Interpolation weight reuse.
//!
//! Rebuilding the destination-to-source index mapping is the dominant cost
//! of resampling identical tile/scene shape combinations. A [`WeightCache`]
//! lets that mapping be reused; it is strictly an optimization - every
//! implementation must produce results identical to rebuilding from
//! scratch, and the no-op cache is the default.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::regrid::InterpolationMethod;
use crate::tile::Tile;

/// Per-destination fractional source indices; `None` marks points outside
/// the source grid or not visible to the satellite.
pub type Weights = Vec<Option<(f64, f64)>>;

/// Collision-free identity of one weight set.
///
/// Two resample calls may share weights only when method, source shape,
/// destination shape, tile center and tile size all agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightKey {
    pub method: InterpolationMethod,
    pub src_nx: usize,
    pub src_ny: usize,
    pub dst_n: usize,
    pub center_lon: f64,
    pub center_lat: f64,
    pub size_m: f64,
}

impl WeightKey {
    /// Build a key for resampling one source shape onto one tile grid.
    pub fn new(
        method: InterpolationMethod,
        src_shape: (usize, usize),
        dst_n: usize,
        tile: &Tile,
    ) -> Self {
        Self {
            method,
            src_nx: src_shape.0,
            src_ny: src_shape.1,
            dst_n,
            center_lon: tile.center.lon,
            center_lat: tile.center.lat,
            size_m: tile.size_m,
        }
    }

    /// Filesystem-safe name encoding every key component.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}x{}_{}x{}__{}_{}_{}",
            self.method,
            self.src_ny,
            self.src_nx,
            self.dst_n,
            self.dst_n,
            self.center_lat,
            self.center_lon,
            self.size_m
        )
    }
}

/// Weight reuse capability.
pub trait WeightCache: Send + Sync {
    /// Return cached weights for `key`, or build (and possibly store) them.
    fn get_or_build(&self, key: &WeightKey, build: &dyn Fn() -> Result<Weights>)
        -> Result<Weights>;
}

/// Cache that never stores anything; every call rebuilds.
pub struct NoopWeightCache;

impl WeightCache for NoopWeightCache {
    fn get_or_build(
        &self,
        _key: &WeightKey,
        build: &dyn Fn() -> Result<Weights>,
    ) -> Result<Weights> {
        build()
    }
}

/// On-disk weight cache shared between concurrent jobs.
///
/// Files are written to a temporary name and renamed into place, so readers
/// never observe a partially written file. Read or write failures fall back
/// to rebuilding; the cache cannot make a job fail.
pub struct DirWeightCache {
    dir: PathBuf,
}

impl DirWeightCache {
    /// Open (creating if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &WeightKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.file_stem()))
    }
}

impl WeightCache for DirWeightCache {
    fn get_or_build(
        &self,
        key: &WeightKey,
        build: &dyn Fn() -> Result<Weights>,
    ) -> Result<Weights> {
        let path = self.path_for(key);

        if let Ok(bytes) = fs::read(&path) {
            match serde_json::from_slice::<(WeightKey, Weights)>(&bytes) {
                Ok((stored_key, weights)) if stored_key == *key => {
                    debug!(path = %path.display(), "weight cache hit");
                    return Ok(weights);
                }
                _ => {
                    debug!(path = %path.display(), "discarding stale weight file");
                }
            }
        }

        let weights = build()?;

        // Temp-file-then-rename keeps concurrent readers safe; failures here
        // only cost a rebuild next time.
        if let Ok(encoded) = serde_json::to_vec(&(key, &weights)) {
            let tmp = self
                .dir
                .join(format!(".{}.{}.tmp", key.file_stem(), std::process::id()));
            if fs::write(&tmp, encoded).is_ok() {
                if let Err(err) = fs::rename(&tmp, &path) {
                    debug!(error = %err, "weight file rename failed");
                    let _ = fs::remove_file(&tmp);
                }
            }
        }

        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiler_common::GeoPoint;

    fn key() -> WeightKey {
        let tile = Tile::new(GeoPoint::new(-60.0, 20.0), 256_000.0).unwrap();
        WeightKey::new(InterpolationMethod::Bilinear, (128, 96), 64, &tile)
    }

    #[test]
    fn test_file_stem_encodes_all_parts() {
        let stem = key().file_stem();
        assert_eq!(stem, "bilinear_96x128_64x64__20_-60_256000");
    }

    #[test]
    fn test_noop_rebuilds_every_time() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = AtomicUsize::new(0);
        let cache = NoopWeightCache;
        let build = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Some((1.0, 2.0))])
        };

        cache.get_or_build(&key(), &build).unwrap();
        cache.get_or_build(&key(), &build).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dir_cache_roundtrip() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let dir = tempfile::tempdir().unwrap();
        let cache = DirWeightCache::new(dir.path()).unwrap();
        let calls = AtomicUsize::new(0);
        let build = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Some((1.5, 2.5)), None])
        };

        let first = cache.get_or_build(&key(), &build).unwrap();
        let second = cache.get_or_build(&key(), &build).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "second call should hit the cache");
    }

    #[test]
    fn test_dir_cache_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DirWeightCache::new(dir.path()).unwrap();
        let k = key();
        std::fs::write(cache.path_for(&k), b"not json").unwrap();

        let weights = cache.get_or_build(&k, &|| Ok(vec![None])).unwrap();
        assert_eq!(weights, vec![None]);
    }
}
