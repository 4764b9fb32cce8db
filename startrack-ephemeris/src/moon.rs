//! Low precision lunar position (Astronomical Almanac style truncated
//! series). Worst case error is around 0.3 degrees in longitude, a fraction
//! of a degree in latitude.

const AU_KM: f64 = 149_597_870.7;
const EARTH_RADIUS_KM: f64 = 6_378.14;

fn sin_deg(d: f64) -> f64 {
    d.to_radians().sin()
}

fn cos_deg(d: f64) -> f64 {
    d.to_radians().cos()
}

/// Geocentric ecliptic (longitude deg, latitude deg, distance AU) of the
/// Moon at `t` Julian centuries past J2000.
pub(crate) fn geocentric(t: f64) -> (f64, f64, f64) {
    let lon = 218.32
        + 481_267.883 * t
        + 6.29 * sin_deg(134.9 + 477_198.85 * t)
        - 1.27 * sin_deg(259.2 - 413_335.38 * t)
        + 0.66 * sin_deg(235.7 + 890_534.23 * t)
        + 0.21 * sin_deg(269.9 + 954_397.70 * t)
        - 0.19 * sin_deg(357.5 + 35_999.05 * t)
        - 0.11 * sin_deg(186.6 + 966_404.05 * t);

    let lat = 5.13 * sin_deg(93.3 + 483_202.03 * t)
        + 0.28 * sin_deg(228.2 + 960_400.87 * t)
        - 0.28 * sin_deg(318.3 + 6_003.18 * t)
        - 0.17 * sin_deg(217.6 - 407_332.20 * t);

    let parallax = 0.9508
        + 0.0518 * cos_deg(134.9 + 477_198.85 * t)
        + 0.0095 * cos_deg(259.2 - 413_335.38 * t)
        + 0.0078 * cos_deg(235.7 + 890_534.23 * t)
        + 0.0028 * cos_deg(269.9 + 954_397.70 * t);

    let distance_au = EARTH_RADIUS_KM / parallax.to_radians().sin() / AU_KM;

    (lon.rem_euclid(360.0), lat, distance_au)
}
