use crate::observation::{ObservationRecord, CSV_HEADER};
use anyhow::{Context, Result};
use log::debug;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Narrow append/read seam between the sampling loop and the dashboard, so
/// either side can run against an in-memory store in tests.
pub trait Store {
    fn append(&mut self, record: &ObservationRecord) -> Result<()>;
    fn load_all(&self) -> Result<Vec<ObservationRecord>>;
}

/// Append-only CSV log. Exactly one writer (the sampler), any number of
/// readers; the file is never truncated or rewritten by this type.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore { path: path.into() }
    }
}

impl Store for CsvStore {
    /// Appends one row, writing the column header first iff the file is
    /// empty, and flushes before returning so concurrent readers see the row.
    fn append(&mut self, record: &ObservationRecord) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {} for append", self.path.display()))?;
        let write_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            writer.write_record(&CSV_HEADER)?;
        }
        writer.write_record(&record.to_fields())?;
        writer.flush()?;
        Ok(())
    }

    /// All rows in append order. A missing file is an empty log, not an
    /// error; rows a concurrent writer has not finished flushing are skipped.
    fn load_all(&self) -> Result<Vec<ObservationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    debug!("skipping unreadable row: {}", err);
                    continue;
                }
            };
            match ObservationRecord::from_csv(&row) {
                Some(record) => rows.push(record),
                None => debug!("skipping malformed row: {:?}", row),
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory stand-in for [`CsvStore`].
    #[derive(Default)]
    pub struct MemStore {
        pub rows: Vec<ObservationRecord>,
    }

    impl Store for MemStore {
        fn append(&mut self, record: &ObservationRecord) -> Result<()> {
            self.rows.push(record.clone());
            Ok(())
        }

        fn load_all(&self) -> Result<Vec<ObservationRecord>> {
            Ok(self.rows.clone())
        }
    }

    impl Store for std::rc::Rc<std::cell::RefCell<MemStore>> {
        fn append(&mut self, record: &ObservationRecord) -> Result<()> {
            self.borrow_mut().append(record)
        }

        fn load_all(&self) -> Result<Vec<ObservationRecord>> {
            self.borrow().load_all()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::io::Write;

    fn record(body: &str, minute: u32) -> ObservationRecord {
        ObservationRecord {
            time: Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
                + Duration::minutes(i64::from(minute)),
            body: body.to_string(),
            ra: "15h 19m 00.64s".to_string(),
            dec: "-20deg 54' 30.7\"".to_string(),
            distance_au: 1.5,
            altitude_deg: 10.0,
            azimuth_deg: 120.0,
        }
    }

    #[test]
    fn append_then_load_preserves_count_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(dir.path().join("log.csv"));

        for minute in 0..3 {
            store.append(&record("Sun", minute)).unwrap();
        }
        // a second batch through a fresh handle, as a restarted sampler would
        let mut store = CsvStore::new(dir.path().join("log.csv"));
        for minute in 3..5 {
            store.append(&record("Moon", minute)).unwrap();
        }

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 5);
        let minutes: Vec<_> = rows.iter().map(|r| r.time.timestamp() / 60 % 60).collect();
        assert_eq!(minutes, vec![0, 1, 2, 3, 4]);
        assert_eq!(rows[0].body, "Sun");
        assert_eq!(rows[4].body, "Moon");
    }

    #[test]
    fn header_is_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        CsvStore::new(&path).append(&record("Sun", 0)).unwrap();
        CsvStore::new(&path).append(&record("Sun", 1)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("Time,Body,RA").count(), 1);
        assert!(text.starts_with("Time,Body,RA,Dec,Distance_AU,Altitude_deg,Azimuth_deg"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn partially_flushed_final_line_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut store = CsvStore::new(&path);
        store.append(&record("Sun", 0)).unwrap();
        store.append(&record("Moon", 1)).unwrap();

        // simulate a writer caught mid-row
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "2024-05-01 20:05:00,Mars,\"15h 1").unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].body, "Moon");
    }

    #[test]
    fn unknown_body_rows_survive_the_reader() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(dir.path().join("log.csv"));
        store.append(&record("Xena", 0)).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].body, "Xena");
    }
}
