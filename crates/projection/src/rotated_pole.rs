//! Rotated-pole transform.
//!
//! A rigid rotation of the sphere that carries the equator/prime-meridian
//! origin to an arbitrary center point while keeping local east and north
//! directions. Because the rotation preserves great-circle distances, a
//! figure laid out around (0°, 0°) - where degrees of longitude and latitude
//! span equal distances - stays metrically identical after being moved to
//! the center. This is what lets tile geometry always be computed in the
//! equatorial frame.

/// Spherical rotation centered on a target point.
///
/// Equivalent to a rotated-pole coordinate system whose pole is displaced
/// from the geographic pole by the center latitude along the center
/// meridian.
#[derive(Debug, Clone, Copy)]
pub struct RotatedPole {
    /// Center longitude in degrees.
    lon0: f64,
    /// Center latitude in degrees.
    lat0: f64,
}

impl RotatedPole {
    /// Rotation that carries (0°, 0°) to the given center.
    pub fn centered_on(lon0: f64, lat0: f64) -> Self {
        Self { lon0, lat0 }
    }

    /// Map a point from the equator-centered frame to true coordinates.
    ///
    /// `(0, 0)` maps to the center; small offsets map to points displaced
    /// by the same great-circle distance east/north of the center.
    pub fn to_true(&self, lon_r: f64, lat_r: f64) -> (f64, f64) {
        let (sin_lon_r, cos_lon_r) = lon_r.to_radians().sin_cos();
        let (sin_lat_r, cos_lat_r) = lat_r.to_radians().sin_cos();

        // Unit vector of the rotated-frame point.
        let x = cos_lat_r * cos_lon_r;
        let y = cos_lat_r * sin_lon_r;
        let z = sin_lat_r;

        let (sin_lat0, cos_lat0) = self.lat0.to_radians().sin_cos();
        let (sin_lon0, cos_lon0) = self.lon0.to_radians().sin_cos();

        // Tilt the frame up to the center latitude, then spin to the
        // center longitude.
        let xt = x * cos_lat0 - z * sin_lat0;
        let yt = y;
        let zt = x * sin_lat0 + z * cos_lat0;

        let xr = xt * cos_lon0 - yt * sin_lon0;
        let yr = xt * sin_lon0 + yt * cos_lon0;

        (yr.atan2(xr).to_degrees(), zt.asin().to_degrees())
    }

    /// Map a true point back into the equator-centered frame.
    pub fn to_rotated(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();

        let x = cos_lat * cos_lon;
        let y = cos_lat * sin_lon;
        let z = sin_lat;

        let (sin_lat0, cos_lat0) = self.lat0.to_radians().sin_cos();
        let (sin_lon0, cos_lon0) = self.lon0.to_radians().sin_cos();

        // Inverse order: unspin the longitude, then tilt back down.
        let xt = x * cos_lon0 + y * sin_lon0;
        let yt = -x * sin_lon0 + y * cos_lon0;
        let zt = z;

        let xr = xt * cos_lat0 + zt * sin_lat0;
        let zr = -xt * sin_lat0 + zt * cos_lat0;

        (yt.atan2(xr).to_degrees(), zr.asin().to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_at_equator_origin() {
        let rot = RotatedPole::centered_on(0.0, 0.0);
        let (lon, lat) = rot.to_true(3.5, -2.25);
        assert!((lon - 3.5).abs() < 1e-12);
        assert!((lat - (-2.25)).abs() < 1e-12);
    }

    #[test]
    fn test_origin_maps_to_center() {
        let rot = RotatedPole::centered_on(-62.5, 17.25);
        let (lon, lat) = rot.to_true(0.0, 0.0);
        assert!((lon - (-62.5)).abs() < 1e-10);
        assert!((lat - 17.25).abs() < 1e-10);
    }

    #[test]
    fn test_pure_longitude_shift_at_zero_lat() {
        let rot = RotatedPole::centered_on(30.0, 0.0);
        let (lon, lat) = rot.to_true(2.0, 1.0);
        assert!((lon - 32.0).abs() < 1e-10);
        assert!((lat - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip() {
        let rot = RotatedPole::centered_on(-55.0, 42.0);
        for &(lon_r, lat_r) in &[(0.0, 0.0), (1.5, -1.5), (-2.0, 2.0), (0.7, 0.0)] {
            let (lon, lat) = rot.to_true(lon_r, lat_r);
            let (lon_b, lat_b) = rot.to_rotated(lon, lat);
            assert!(
                (lon_b - lon_r).abs() < 1e-9 && (lat_b - lat_r).abs() < 1e-9,
                "roundtrip failed for ({}, {}): got ({}, {})",
                lon_r,
                lat_r,
                lon_b,
                lat_b
            );
        }
    }

    #[test]
    fn test_distance_preserved() {
        // Great-circle separation of two rotated-frame points must survive
        // the rotation.
        fn gc_dist(a: (f64, f64), b: (f64, f64)) -> f64 {
            let (la, pa) = (a.0.to_radians(), a.1.to_radians());
            let (lb, pb) = (b.0.to_radians(), b.1.to_radians());
            (pa.sin() * pb.sin() + pa.cos() * pb.cos() * (la - lb).cos()).acos()
        }

        let rot = RotatedPole::centered_on(-60.0, 35.0);
        let a_r = (1.0, 1.0);
        let b_r = (-1.0, -1.0);
        let before = gc_dist(a_r, b_r);
        let after = gc_dist(rot.to_true(a_r.0, a_r.1), rot.to_true(b_r.0, b_r.1));
        assert!(
            (before - after).abs() < 1e-10,
            "distance changed: {} vs {}",
            before,
            after
        );
    }
}
