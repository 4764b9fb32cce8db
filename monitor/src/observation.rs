use chrono::{DateTime, NaiveDateTime, Utc};

/// Column order of the observation log. Written once at file creation.
pub const CSV_HEADER: [&str; 7] = [
    "Time",
    "Body",
    "RA",
    "Dec",
    "Distance_AU",
    "Altitude_deg",
    "Azimuth_deg",
];

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One sampled sky position. Immutable once appended to the log.
///
/// `ra`/`dec` stay in their serialized sexagesimal text form here; decoding
/// to numbers is the dashboard's concern (see [`crate::angle`]). `body` is a
/// plain string so that rows written by a newer catalog never break an older
/// reader.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationRecord {
    pub time: DateTime<Utc>,
    pub body: String,
    pub ra: String,
    pub dec: String,
    pub distance_au: f64,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

impl ObservationRecord {
    pub fn to_fields(&self) -> [String; 7] {
        [
            self.time.format(TIME_FORMAT).to_string(),
            self.body.clone(),
            self.ra.clone(),
            self.dec.clone(),
            format!("{:.6}", self.distance_au),
            format!("{:.4}", self.altitude_deg),
            format!("{:.4}", self.azimuth_deg),
        ]
    }

    /// `None` for rows with missing or unparsable fields, e.g. a partially
    /// flushed final line.
    pub fn from_csv(row: &csv::StringRecord) -> Option<Self> {
        let time = NaiveDateTime::parse_from_str(row.get(0)?, TIME_FORMAT)
            .ok()?
            .and_utc();
        Some(ObservationRecord {
            time,
            body: row.get(1)?.to_string(),
            ra: row.get(2)?.to_string(),
            dec: row.get(3)?.to_string(),
            distance_au: row.get(4)?.parse().ok()?,
            altitude_deg: row.get(5)?.parse().ok()?,
            azimuth_deg: row.get(6)?.parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ObservationRecord {
        ObservationRecord {
            time: Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap(),
            body: "Mars".to_string(),
            ra: "15h 19m 00.64s".to_string(),
            dec: "-20deg 54' 30.7\"".to_string(),
            distance_au: 1.23456789,
            altitude_deg: 42.4242,
            azimuth_deg: 180.5,
        }
    }

    #[test]
    fn fields_round_trip() {
        let original = record();
        let row = csv::StringRecord::from(original.to_fields().to_vec());
        let parsed = ObservationRecord::from_csv(&row).unwrap();
        assert_eq!(parsed.time, original.time);
        assert_eq!(parsed.body, original.body);
        assert_eq!(parsed.ra, original.ra);
        assert_eq!(parsed.dec, original.dec);
        assert!((parsed.distance_au - original.distance_au).abs() < 1e-6);
    }

    #[test]
    fn truncated_row_is_rejected() {
        let row = csv::StringRecord::from(vec!["2024-05-01 20:30:00", "Mars", "15h 19m 00.64s"]);
        assert!(ObservationRecord::from_csv(&row).is_none());
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let mut fields = record().to_fields().to_vec();
        fields[0] = "yesterday".to_string();
        assert!(ObservationRecord::from_csv(&csv::StringRecord::from(fields)).is_none());
    }
}
