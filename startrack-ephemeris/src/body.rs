use crate::EphemerisError;
use std::fmt;
use std::str::FromStr;

/// A tracked celestial body from the fixed catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    pub const CATALOG: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }

    pub fn from_name(name: &str) -> Option<Body> {
        Body::CATALOG
            .iter()
            .find(|body| body.name().eq_ignore_ascii_case(name.trim()))
            .copied()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::from_name(s).ok_or_else(|| EphemerisError::UnknownBody(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Body::from_name("mars"), Some(Body::Mars));
        assert_eq!(Body::from_name(" JUPITER "), Some(Body::Jupiter));
        assert_eq!(Body::from_name("Vulcan"), None);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for &body in &Body::CATALOG {
            assert_eq!(body.name().parse::<Body>().unwrap(), body);
        }
    }
}
