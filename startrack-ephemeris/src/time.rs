use chrono::{DateTime, Utc};

pub const J2000: f64 = 2_451_545.0;

/// Julian day number for a UTC instant.
pub fn julian_day(utc: DateTime<Utc>) -> f64 {
    let unix = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_millis()) / 1000.0;
    unix / 86_400.0 + 2_440_587.5
}

/// Julian centuries past J2000.
pub fn centuries(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

/// Greenwich mean sidereal time in degrees, [0, 360).
pub fn gmst_degrees(jd: f64) -> f64 {
    let d = jd - J2000;
    let t = d / 36_525.0;
    normalize_degrees(
        280.46061837 + 360.98564736629 * d + 0.000387933 * t * t - t * t * t / 38_710_000.0,
    )
}

pub fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn julian_day_at_j2000_epoch() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(t) - J2000).abs() < 1e-6);
    }

    #[test]
    fn gmst_matches_known_value() {
        // Meeus example 12.b: 1987 April 10, 19:21:00 UT.
        let t = Utc.with_ymd_and_hms(1987, 4, 10, 19, 21, 0).unwrap();
        let gmst = gmst_degrees(julian_day(t));
        // 8h 34m 57.09s sidereal = 128.737873 deg
        assert!((gmst - 128.737873).abs() < 0.01, "{}", gmst);
    }

    #[test]
    fn normalize_wraps_negative_angles() {
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-12);
    }
}
