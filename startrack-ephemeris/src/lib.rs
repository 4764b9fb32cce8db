//! Low precision analytic ephemeris for the classic naked-eye catalog.
//!
//! Positions are computed from Keplerian mean elements (planets), a truncated
//! lunar series (Moon) and the negated heliocentric position of the Earth
//! (Sun). Good to a few arc minutes over the current era, which is plenty for
//! a live tracking dashboard; this crate makes no precision claims beyond
//! that.

mod body;
mod kepler;
mod moon;
mod time;

pub use crate::body::Body;
pub use crate::time::{gmst_degrees, julian_day};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("unknown body: {0}")]
    UnknownBody(String),
}

/// Geodetic position of the ground observer, degrees, east longitude
/// positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

/// Geocentric equatorial coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Equatorial {
    /// Right ascension in decimal hours, [0, 24).
    pub ra_hours: f64,
    /// Declination in degrees, [-90, 90].
    pub dec_deg: f64,
    pub distance_au: f64,
}

/// Topocentric horizontal coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Horizontal {
    /// Altitude above the local horizon in degrees, [-90, 90].
    pub alt_deg: f64,
    /// Azimuth in degrees from north through east, [0, 360).
    pub az_deg: f64,
    pub distance_au: f64,
}

/// Mean obliquity of the ecliptic in degrees at `t` Julian centuries past
/// J2000.
fn obliquity_deg(t: f64) -> f64 {
    23.439291111 - 0.013004167 * t
}

/// Geocentric ecliptic position vector of `body` in AU at `t` Julian
/// centuries past J2000.
fn geocentric_ecliptic(body: Body, t: f64) -> [f64; 3] {
    match body {
        Body::Sun => {
            let e = kepler::heliocentric(&kepler::EARTH, t);
            [-e[0], -e[1], -e[2]]
        }
        Body::Moon => {
            let (lon, lat, r) = moon::geocentric(t);
            let (lon, lat) = (lon.to_radians(), lat.to_radians());
            [
                r * lat.cos() * lon.cos(),
                r * lat.cos() * lon.sin(),
                r * lat.sin(),
            ]
        }
        planet => {
            let p = kepler::heliocentric(kepler::elements(planet), t);
            let e = kepler::heliocentric(&kepler::EARTH, t);
            [p[0] - e[0], p[1] - e[1], p[2] - e[2]]
        }
    }
}

/// Geocentric right ascension, declination and distance of `body` at `utc`.
pub fn equatorial(body: Body, utc: DateTime<Utc>) -> Equatorial {
    let t = time::centuries(time::julian_day(utc));
    let [x, y, z] = geocentric_ecliptic(body, t);

    let eps = obliquity_deg(t).to_radians();
    let xe = x;
    let ye = y * eps.cos() - z * eps.sin();
    let ze = y * eps.sin() + z * eps.cos();

    let r = (xe * xe + ye * ye + ze * ze).sqrt();
    let ra_deg = time::normalize_degrees(ye.atan2(xe).to_degrees());

    Equatorial {
        ra_hours: ra_deg / 15.0,
        dec_deg: (ze / r).asin().to_degrees(),
        distance_au: r,
    }
}

/// Altitude and azimuth of `body` as seen from `site` at `utc`.
///
/// Topocentric parallax is neglected; the returned distance is the
/// geocentric one.
pub fn horizontal(site: Site, body: Body, utc: DateTime<Utc>) -> Horizontal {
    let eq = equatorial(body, utc);

    let lst_deg = time::normalize_degrees(gmst_degrees(time::julian_day(utc)) + site.lon_deg);
    let ha = (lst_deg - eq.ra_hours * 15.0).to_radians();
    let lat = site.lat_deg.to_radians();
    let dec = eq.dec_deg.to_radians();

    let alt = (lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos()).asin();
    // Meeus eq. 13.5: azimuth from south, westward positive.
    let az_south = ha.sin().atan2(ha.cos() * lat.sin() - dec.tan() * lat.cos());

    Horizontal {
        alt_deg: alt.to_degrees(),
        az_deg: time::normalize_degrees(az_south.to_degrees() + 180.0),
        distance_au: eq.distance_au,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn greenwich() -> Site {
        Site {
            lat_deg: 51.4778,
            lon_deg: 0.0,
        }
    }

    #[test]
    fn sun_distance_is_about_one_au() {
        let t = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let eq = equatorial(Body::Sun, t);
        assert!((eq.distance_au - 1.0).abs() < 0.05, "{}", eq.distance_au);
    }

    #[test]
    fn sun_declination_near_winter_solstice() {
        let t = Utc.with_ymd_and_hms(2023, 12, 21, 12, 0, 0).unwrap();
        let eq = equatorial(Body::Sun, t);
        assert!((eq.dec_deg + 23.4).abs() < 0.5, "{}", eq.dec_deg);
    }

    #[test]
    fn sun_near_vernal_equinox_has_small_ra() {
        let t = Utc.with_ymd_and_hms(2024, 3, 20, 4, 0, 0).unwrap();
        let eq = equatorial(Body::Sun, t);
        let ra = if eq.ra_hours > 12.0 {
            eq.ra_hours - 24.0
        } else {
            eq.ra_hours
        };
        assert!(ra.abs() < 0.2, "{}", eq.ra_hours);
    }

    #[test]
    fn moon_distance_in_plausible_range() {
        let t = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let eq = equatorial(Body::Moon, t);
        // 356k .. 407k km in AU
        assert!(
            eq.distance_au > 0.0023 && eq.distance_au < 0.0028,
            "{}",
            eq.distance_au
        );
    }

    #[test]
    fn horizontal_coordinates_stay_in_range() {
        let site = greenwich();
        for hour in 0..24 {
            let t = Utc.with_ymd_and_hms(2024, 2, 10, hour, 0, 0).unwrap();
            for &body in &Body::CATALOG {
                let hz = horizontal(site, body, t);
                assert!((-90.0..=90.0).contains(&hz.alt_deg));
                assert!((0.0..360.0).contains(&hz.az_deg));
                assert!(hz.distance_au > 0.0);
            }
        }
    }

    #[test]
    fn sun_is_due_south_at_local_noon() {
        // Solar transit at Greenwich happens near 12:00 UTC give or take the
        // equation of time.
        let t = Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap();
        let hz = horizontal(greenwich(), Body::Sun, t);
        assert!((hz.az_deg - 180.0).abs() < 5.0, "{}", hz.az_deg);
        assert!(hz.alt_deg > 30.0, "{}", hz.alt_deg);
    }
}
