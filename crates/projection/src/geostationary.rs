//! Geostationary satellite projection.
//!
//! The native projection of full-disk imagery from GOES-R class satellites.
//! The satellite views Earth from a fixed point above the equator; pixel
//! positions are scan angles from nadir. Following the convention of the
//! source NetCDF files, native coordinates here are scan angles multiplied
//! by the perspective point height, giving approximate meters in the image
//! plane.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

/// Geostationary projection between geographic coordinates (lon/lat degrees)
/// and native coordinates (scan-angle meters).
#[derive(Debug, Clone)]
pub struct Geostationary {
    /// Satellite height above Earth center (meters).
    h: f64,
    /// Perspective point height above Earth surface (meters); scales scan
    /// angles into native meters.
    perspective_point_height: f64,
    /// Semi-major axis of the Earth ellipsoid (meters).
    req: f64,
    /// Semi-minor axis of the Earth ellipsoid (meters).
    rpol: f64,
    /// Longitude of the satellite nadir point (radians).
    lambda_0: f64,
}

impl Geostationary {
    /// Create a projection from satellite parameters.
    ///
    /// # Arguments
    /// * `perspective_point_height` - satellite altitude above the surface (meters)
    /// * `semi_major_axis` - Earth equatorial radius (meters)
    /// * `semi_minor_axis` - Earth polar radius (meters)
    /// * `longitude_origin_deg` - satellite longitude (degrees, negative west)
    pub fn new(
        perspective_point_height: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        longitude_origin_deg: f64,
    ) -> Self {
        Self {
            h: perspective_point_height + semi_major_axis,
            perspective_point_height,
            req: semi_major_axis,
            rpol: semi_minor_axis,
            lambda_0: longitude_origin_deg.to_radians(),
        }
    }

    /// Projection for GOES-East (75°W) full-disk imagery with GRS80 axes.
    pub fn goes_east_full_disk() -> Self {
        Self::new(35786023.0, 6378137.0, 6356752.31414, -75.0)
    }

    /// Satellite longitude in degrees.
    pub fn longitude_origin(&self) -> f64 {
        self.lambda_0.to_degrees()
    }

    /// Convert geographic coordinates to native coordinates.
    ///
    /// Returns `None` when the point is not visible from the satellite
    /// (beyond the limb or behind Earth).
    ///
    /// Based on GOES-R PUG Volume 4, Section 4.2.8.
    pub fn geo_to_native(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let lat_rad = lat_deg.to_radians();
        let lon_rad = lon_deg.to_radians();

        // Horizon check: the limb sits at cos^-1(req / h) from nadir.
        let dlon = lon_rad - self.lambda_0;
        let cos_c = lat_rad.cos() * dlon.cos();
        let horizon_angle = (self.req / self.h).acos();
        if cos_c.acos() > horizon_angle {
            return None;
        }

        // Geocentric latitude on the oblate ellipsoid.
        let phi_c = ((self.rpol / self.req).powi(2) * lat_rad.tan()).atan();
        let e2 = 1.0 - (self.rpol / self.req).powi(2);
        let rc = self.rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        // Satellite-frame Cartesian position of the surface point.
        let sx = self.h - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        if sx <= 0.0 {
            return None;
        }

        let x_rad = (-sy).atan2(sx);
        let y_rad = sz.atan2(sx.hypot(sy));

        Some((
            x_rad * self.perspective_point_height,
            y_rad * self.perspective_point_height,
        ))
    }

    /// Convert native coordinates back to geographic coordinates.
    ///
    /// Returns `None` when the scan angle points past the limb into space.
    pub fn native_to_geo(&self, x_m: f64, y_m: f64) -> Option<(f64, f64)> {
        let x_rad = x_m / self.perspective_point_height;
        let y_rad = y_m / self.perspective_point_height;

        let sin_x = x_rad.sin();
        let cos_x = x_rad.cos();
        let sin_y = y_rad.sin();
        let cos_y = y_rad.cos();

        // Distance from satellite to the surface along the view ray.
        let a = sin_x.powi(2)
            + cos_x.powi(2) * (cos_y.powi(2) + (self.req / self.rpol).powi(2) * sin_y.powi(2));
        let b = -2.0 * self.h * cos_x * cos_y;
        let c = self.h.powi(2) - self.req.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let rs = (-b - discriminant.sqrt()) / (2.0 * a);

        let sx = rs * cos_x * cos_y;
        let sy = -rs * sin_x;
        let sz = rs * cos_x * sin_y;

        let lat = ((self.req / self.rpol).powi(2) * sz / (self.h - sx).hypot(sy)).atan();
        let lon = self.lambda_0 - sy.atan2(self.h - sx);

        Some((lon.to_degrees(), lat.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nadir_maps_to_origin() {
        let proj = Geostationary::goes_east_full_disk();

        let (x, y) = proj.geo_to_native(-75.0, 0.0).unwrap();
        assert!(x.abs() < 1.0, "nadir x should be ~0 m, got {}", x);
        assert!(y.abs() < 1.0, "nadir y should be ~0 m, got {}", y);

        let (lon, lat) = proj.native_to_geo(0.0, 0.0).unwrap();
        assert!((lon - (-75.0)).abs() < 1e-6);
        assert!(lat.abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_caribbean() {
        let proj = Geostationary::goes_east_full_disk();

        let (lon0, lat0) = (-60.0, 20.0);
        let (x, y) = proj.geo_to_native(lon0, lat0).unwrap();
        let (lon1, lat1) = proj.native_to_geo(x, y).unwrap();

        assert!((lon0 - lon1).abs() < 1e-6, "lon roundtrip {} vs {}", lon0, lon1);
        assert!((lat0 - lat1).abs() < 1e-6, "lat roundtrip {} vs {}", lat0, lat1);
    }

    #[test]
    fn test_east_is_positive_x_north_is_positive_y() {
        let proj = Geostationary::goes_east_full_disk();

        let (x_e, _) = proj.geo_to_native(-70.0, 0.0).unwrap();
        assert!(x_e > 0.0, "east of nadir should have x > 0, got {}", x_e);

        let (_, y_n) = proj.geo_to_native(-75.0, 10.0).unwrap();
        assert!(y_n > 0.0, "north of nadir should have y > 0, got {}", y_n);
    }

    #[test]
    fn test_far_side_not_visible() {
        let proj = Geostationary::goes_east_full_disk();
        assert!(proj.geo_to_native(105.0, 0.0).is_none());
        assert!(proj.geo_to_native(180.0, 10.0).is_none());
    }

    #[test]
    fn test_off_disk_scan_angle_is_none() {
        let proj = Geostationary::goes_east_full_disk();
        // ~0.5 rad scan angle points well past the limb.
        let far = 0.5 * 35786023.0;
        assert!(proj.native_to_geo(far, far).is_none());
    }
}
