//! Heliocentric planetary positions from Keplerian mean elements.
//!
//! Elements and centennial rates are the Standish (JPL) J2000 approximation
//! valid 1800-2050; Pluto is included on the same footing even though the
//! fit degrades towards the interval edges.

use crate::body::Body;

/// One orbital element as (value at J2000, rate per Julian century).
type Element = (f64, f64);

pub(crate) struct Elements {
    /// Semi-major axis, AU.
    pub a: Element,
    /// Eccentricity.
    pub e: Element,
    /// Inclination, degrees.
    pub i: Element,
    /// Mean longitude, degrees.
    pub l: Element,
    /// Longitude of perihelion, degrees.
    pub peri: Element,
    /// Longitude of the ascending node, degrees.
    pub node: Element,
}

pub(crate) const EARTH: Elements = Elements {
    a: (1.00000261, 0.00000562),
    e: (0.01671123, -0.00004392),
    i: (-0.00001531, -0.01294668),
    l: (100.46457166, 35999.37244981),
    peri: (102.93768193, 0.32327364),
    node: (0.0, 0.0),
};

const MERCURY: Elements = Elements {
    a: (0.38709927, 0.00000037),
    e: (0.20563593, 0.00001906),
    i: (7.00497902, -0.00594749),
    l: (252.25032350, 149472.67411175),
    peri: (77.45779628, 0.16047689),
    node: (48.33076593, -0.12534081),
};

const VENUS: Elements = Elements {
    a: (0.72333566, 0.00000390),
    e: (0.00677672, -0.00004107),
    i: (3.39467605, -0.00078890),
    l: (181.97909950, 58517.81538729),
    peri: (131.60246718, 0.00268329),
    node: (76.67984255, -0.27769418),
};

const MARS: Elements = Elements {
    a: (1.52371034, 0.00001847),
    e: (0.09339410, 0.00007882),
    i: (1.84969142, -0.00813131),
    l: (-4.55343205, 19140.30268499),
    peri: (-23.94362959, 0.44441088),
    node: (49.55953891, -0.29257343),
};

const JUPITER: Elements = Elements {
    a: (5.20288700, -0.00011607),
    e: (0.04838624, -0.00013253),
    i: (1.30439695, -0.00183714),
    l: (34.39644051, 3034.74612775),
    peri: (14.72847983, 0.21252668),
    node: (100.47390909, 0.20469106),
};

const SATURN: Elements = Elements {
    a: (9.53667594, -0.00125060),
    e: (0.05386179, -0.00050991),
    i: (2.48599187, 0.00193609),
    l: (49.95424423, 1222.49362201),
    peri: (92.59887831, -0.41897216),
    node: (113.66242448, -0.28867794),
};

const URANUS: Elements = Elements {
    a: (19.18916464, -0.00196176),
    e: (0.04725744, -0.00004397),
    i: (0.77263783, -0.00242939),
    l: (313.23810451, 428.48202785),
    peri: (170.95427630, 0.40805281),
    node: (74.01692503, 0.04240589),
};

const NEPTUNE: Elements = Elements {
    a: (30.06992276, 0.00026291),
    e: (0.00859048, 0.00005105),
    i: (1.77004347, 0.00035372),
    l: (-55.12002969, 218.45945325),
    peri: (44.96476227, -0.32241464),
    node: (131.78422574, -0.00508664),
};

const PLUTO: Elements = Elements {
    a: (39.48211675, -0.00031596),
    e: (0.24882730, 0.00005170),
    i: (17.14001206, 0.00004818),
    l: (238.92903833, 145.20780515),
    peri: (224.06891629, -0.04062942),
    node: (110.30393684, -0.01183482),
};

/// Elements for a major planet. Sun and Moon are handled elsewhere.
pub(crate) fn elements(body: Body) -> &'static Elements {
    match body {
        Body::Mercury => &MERCURY,
        Body::Venus => &VENUS,
        Body::Mars => &MARS,
        Body::Jupiter => &JUPITER,
        Body::Saturn => &SATURN,
        Body::Uranus => &URANUS,
        Body::Neptune => &NEPTUNE,
        Body::Pluto => &PLUTO,
        Body::Sun | Body::Moon => &EARTH,
    }
}

/// Newton iteration on Kepler's equation `E - e sin E = M`, radians.
pub(crate) fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = if e < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Heliocentric ecliptic position in AU at `t` Julian centuries past J2000.
pub(crate) fn heliocentric(el: &Elements, t: f64) -> [f64; 3] {
    let at = |e: Element| e.0 + e.1 * t;

    let a = at(el.a);
    let e = at(el.e);
    let i = at(el.i).to_radians();
    let l = at(el.l);
    let peri = at(el.peri);
    let node = at(el.node);

    let m = (l - peri).rem_euclid(360.0).to_radians();
    let ecc = solve_kepler(m, e);

    // Position in the orbital plane, perihelion along +x.
    let xp = a * (ecc.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc.sin();

    let w = (peri - node).to_radians();
    let o = node.to_radians();
    let (sin_w, cos_w) = w.sin_cos();
    let (sin_o, cos_o) = o.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    [
        (cos_w * cos_o - sin_w * sin_o * cos_i) * xp + (-sin_w * cos_o - cos_w * sin_o * cos_i) * yp,
        (cos_w * sin_o + sin_w * cos_o * cos_i) * xp + (-sin_w * sin_o + cos_w * cos_o * cos_i) * yp,
        sin_w * sin_i * xp + cos_w * sin_i * yp,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kepler_solution_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.0167), (2.5, 0.2056), (5.9, 0.9)] {
            let ecc = solve_kepler(m, e);
            assert!((ecc - e * ecc.sin() - m).abs() < 1e-10);
        }
    }

    #[test]
    fn earth_orbit_radius_near_one_au() {
        for quarter in 0..4 {
            let r = heliocentric(&EARTH, 0.24 + 0.25 * f64::from(quarter) / 100.0);
            let d = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
            assert!((d - 1.0).abs() < 0.02, "{}", d);
        }
    }

    #[test]
    fn mars_semi_major_axis_bounds_orbit() {
        let r = heliocentric(elements(crate::Body::Mars), 0.25);
        let d = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
        // between perihelion and aphelion
        assert!(d > 1.38 && d < 1.67, "{}", d);
    }
}
