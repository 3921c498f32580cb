//! Local solar-noon helpers.
//!
//! Scenes are most useful for visible-channel composites when the sun is
//! high over the sampled region, so scene selection typically targets
//! acquisition times near local solar zenith for the region's longitude.

use chrono::{DateTime, Duration, Timelike, Utc};

/// Seconds of solar time per degree of longitude.
const SECONDS_PER_DEGREE: f64 = 24.0 * 60.0 * 60.0 / 360.0;

/// Offset of local solar noon at `lon` relative to noon UTC.
///
/// Eastern longitudes reach zenith before UTC noon, so their offset is
/// negative.
pub fn zenith_time_offset(lon: f64) -> Duration {
    Duration::milliseconds((-lon * SECONDS_PER_DEGREE * 1000.0).round() as i64)
}

/// The most recent local solar noon at `lon`, at or before `t_ref`.
pub fn nearest_zenith_time(lon: f64, t_ref: DateTime<Utc>) -> DateTime<Utc> {
    let since_midday = Duration::hours(t_ref.hour() as i64 - 12)
        + Duration::minutes(t_ref.minute() as i64)
        + Duration::seconds(t_ref.second() as i64)
        + Duration::nanoseconds(t_ref.nanosecond() as i64);

    let mut t_zenith = t_ref - since_midday + zenith_time_offset(lon);
    if t_zenith > t_ref {
        t_zenith -= Duration::hours(24);
    }
    t_zenith
}
