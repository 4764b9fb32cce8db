//! Sexagesimal angle text, the way the observation log stores RA and Dec.
//!
//! Encoding is exact and canonical; decoding is deliberately lenient because
//! log files get edited by hand and pass through spreadsheet tools that
//! re-quote and re-space fields.

use log::warn;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleKind {
    /// Hours, minutes, seconds: `15h 19m 00.64s`.
    RightAscension,
    /// Degrees, arc minutes, arc seconds: `-20deg 54' 30.7"`.
    Declination,
}

impl fmt::Display for AngleKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AngleKind::RightAscension => "right ascension",
            AngleKind::Declination => "declination",
        })
    }
}

/// Splits a non-negative value into (whole, minutes, seconds) with the
/// seconds rounded to `1/scale`. Rounding happens on an integer total so a
/// carry ripples all the way up instead of producing `59' 60.0"`.
fn split_sexagesimal(value: f64, scale: i64) -> (i64, i64, f64) {
    let total = (value * 3600.0 * scale as f64).round() as i64;
    let minutes_total = total / (60 * scale);
    let seconds = (total % (60 * scale)) as f64 / scale as f64;
    (minutes_total / 60, minutes_total % 60, seconds)
}

/// Renders `value` (decimal hours for RA, decimal degrees for Dec) in the
/// log's canonical text form.
pub fn encode(value: f64, kind: AngleKind) -> String {
    match kind {
        AngleKind::RightAscension => {
            let (hours, minutes, seconds) = split_sexagesimal(value.abs(), 100);
            format!("{:02}h {:02}m {:05.2}s", hours, minutes, seconds)
        }
        AngleKind::Declination => {
            let sign = if value < 0.0 { "-" } else { "" };
            let (degrees, minutes, seconds) = split_sexagesimal(value.abs(), 10);
            format!("{}{}deg {:02}' {:04.1}\"", sign, degrees, minutes, seconds)
        }
    }
}

/// Parses sexagesimal text back to decimal hours or degrees. Unparsable text
/// yields `None` with a warning; the caller decides which panels lose the
/// row.
pub fn decode(text: &str, kind: AngleKind) -> Option<f64> {
    match parse_compact(&canonicalize(text), kind) {
        Some(value) => Some(value),
        None => {
            warn!("unparsable {} value: {:?}", kind, text);
            None
        }
    }
}

/// Collapses the accepted notational variants onto one compact form:
/// `deg`/`°` become `d`, `'` becomes `m`, `"` becomes `s`, doubled quotes
/// from CSV re-quoting become single ones, all whitespace goes away.
fn canonicalize(text: &str) -> String {
    text.trim()
        .replace("\"\"", "\"")
        .replace("deg", "d")
        .replace('°', "d")
        .replace('\'', "m")
        .replace('"', "s")
        .split_whitespace()
        .collect()
}

fn parse_compact(text: &str, kind: AngleKind) -> Option<f64> {
    let (sign, text) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let unit = match kind {
        AngleKind::RightAscension => 'h',
        AngleKind::Declination => 'd',
    };
    let (whole, rest) = text.split_once(unit)?;
    let (minutes, rest) = rest.split_once('m')?;

    let whole = parse_field(whole)?;
    let minutes = parse_field(minutes)?;
    let seconds = match rest {
        "" => 0.0,
        rest => parse_field(rest.strip_suffix('s')?)?,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    Some(sign * (whole + minutes / 60.0 + seconds / 3600.0))
}

/// One numeric component. Signs and empty fields are rejected here; the
/// overall sign was already stripped.
fn parse_field(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    if value.is_finite() && value >= 0.0 && !text.starts_with('-') {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_values() {
        assert_eq!(
            encode(15.316844, AngleKind::RightAscension),
            "15h 19m 00.64s"
        );
        assert_eq!(
            encode(-20.908528, AngleKind::Declination),
            "-20deg 54' 30.7\""
        );
    }

    #[test]
    fn rounded_seconds_carry_into_minutes_and_hours() {
        assert_eq!(
            encode(9.999_999_9, AngleKind::RightAscension),
            "10h 00m 00.00s"
        );
        assert_eq!(
            encode(29.999_999_9, AngleKind::Declination),
            "30deg 00' 00.0\""
        );
    }

    #[test]
    fn decode_round_trips_encoded_values() {
        for &ra in &[0.0, 5.5, 15.316844, 23.999] {
            let text = encode(ra, AngleKind::RightAscension);
            let back = decode(&text, AngleKind::RightAscension).unwrap();
            assert!((back - ra).abs() < 1e-3, "{} -> {} -> {}", ra, text, back);
        }
        for &dec in &[-89.9, -20.908528, 0.0, 0.4, 66.56] {
            let text = encode(dec, AngleKind::Declination);
            let back = decode(&text, AngleKind::Declination).unwrap();
            assert!((back - dec).abs() < 1e-3, "{} -> {} -> {}", dec, text, back);
        }
    }

    #[test]
    fn decode_accepts_noisy_variants() {
        let expected = -20.908528;
        for text in [
            "-20deg 54' 30.7\"",
            "  -20deg 54' 30.7\"\"  ",
            "-20° 54' 30.7\"",
            "-20d54m30.7s",
        ] {
            let value = decode(text, AngleKind::Declination).unwrap();
            assert!((value - expected).abs() < 1e-5, "{:?} -> {}", text, value);
        }

        let value = decode("15h19m00.64s", AngleKind::RightAscension).unwrap();
        assert!((value - 15.316844).abs() < 1e-5);
    }

    #[test]
    fn missing_seconds_field_is_allowed() {
        let value = decode("15h 19m", AngleKind::RightAscension).unwrap();
        assert!((value - 15.316_667).abs() < 1e-5);
    }

    #[test]
    fn decode_rejects_garbage() {
        for text in ["", "not an angle", "12x 30m", "???", "h m s"] {
            assert_eq!(decode(text, AngleKind::RightAscension), None, "{:?}", text);
            assert_eq!(decode(text, AngleKind::Declination), None, "{:?}", text);
        }
    }

    #[test]
    fn decode_rejects_out_of_range_components() {
        assert_eq!(decode("15h 75m 00.00s", AngleKind::RightAscension), None);
        assert_eq!(decode("10deg 05' 61.0\"", AngleKind::Declination), None);
        assert_eq!(decode("10deg -5' 30.0\"", AngleKind::Declination), None);
    }
}
