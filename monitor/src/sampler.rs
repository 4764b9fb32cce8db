//! Fixed-interval measurement loop: query the ephemeris for every catalog
//! body, append one row per body to the log, echo each row for the operator.

use crate::angle::{self, AngleKind};
use crate::observation::ObservationRecord;
use crate::store::Store;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use startrack_ephemeris::{Body, Equatorial, Horizontal, Site};
use std::thread;
use std::time::{Duration, Instant};

/// Position provider seam; the production impl is [`SkyModel`], tests
/// substitute a deterministic fake.
pub trait Ephemeris {
    /// Geocentric RA/Dec and distance.
    fn equatorial(&self, body: Body, t: DateTime<Utc>) -> Result<Equatorial>;
    /// Alt/Az and line-of-sight distance for a ground observer.
    fn horizontal(&self, site: Site, body: Body, t: DateTime<Utc>) -> Result<Horizontal>;
}

/// The analytic ephemeris from `startrack-ephemeris`.
pub struct SkyModel;

impl Ephemeris for SkyModel {
    fn equatorial(&self, body: Body, t: DateTime<Utc>) -> Result<Equatorial> {
        Ok(startrack_ephemeris::equatorial(body, t))
    }

    fn horizontal(&self, site: Site, body: Body, t: DateTime<Utc>) -> Result<Horizontal> {
        Ok(startrack_ephemeris::horizontal(site, body, t))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SamplerConfig {
    pub duration: Duration,
    pub interval: Duration,
}

impl SamplerConfig {
    /// Validates `duration >= interval > 0`; invalid values are fatal before
    /// any sampling starts.
    pub fn from_secs(duration: u64, interval: u64) -> Result<Self> {
        if interval == 0 {
            bail!("measurement interval must be positive");
        }
        if duration < interval {
            bail!(
                "duration ({}s) must be at least the measurement interval ({}s)",
                duration,
                interval
            );
        }
        Ok(SamplerConfig {
            duration: Duration::from_secs(duration),
            interval: Duration::from_secs(interval),
        })
    }
}

pub struct Sampler<P, S> {
    provider: P,
    store: S,
    site: Site,
    config: SamplerConfig,
}

impl<P: Ephemeris, S: Store> Sampler<P, S> {
    pub fn new(provider: P, store: S, site: Site, config: SamplerConfig) -> Self {
        Sampler {
            provider,
            store,
            site,
            config,
        }
    }

    /// Runs the measurement loop until the end time computed at start.
    ///
    /// The loop is wall-clock driven: a slow tick (slow provider, many
    /// bodies) shortens the remaining tick count instead of stretching the
    /// total run time. Returns the number of rows written.
    pub fn run(&mut self) -> Result<u64> {
        let end = Instant::now() + self.config.duration;
        let mut written = 0u64;

        info!(
            "logging {} bodies every {}s for {}s to come",
            Body::CATALOG.len(),
            self.config.interval.as_secs(),
            self.config.duration.as_secs()
        );

        while Instant::now() < end {
            let t = Utc::now();
            for &body in &Body::CATALOG {
                match self.sample(body, t) {
                    Ok(record) => {
                        info!(
                            "{}: RA={}, Dec={}, Dist={:.2} AU, Alt={:.2} deg, Az={:.2} deg",
                            record.body,
                            record.ra,
                            record.dec,
                            record.distance_au,
                            record.altitude_deg,
                            record.azimuth_deg
                        );
                        match self.store.append(&record) {
                            Ok(()) => written += 1,
                            Err(err) => error!("failed to append {} row: {:#}", body, err),
                        }
                    }
                    // one bad body never aborts the tick or the loop
                    Err(err) => warn!("{}: ephemeris query failed, row skipped: {:#}", body, err),
                }
            }
            // never sleep past the end time, so total runtime stays bounded
            // by the configured duration plus one tick of processing
            match end.checked_duration_since(Instant::now()) {
                Some(remaining) => thread::sleep(remaining.min(self.config.interval)),
                None => break,
            }
        }

        info!("logging complete, {} rows written", written);
        Ok(written)
    }

    fn sample(&self, body: Body, t: DateTime<Utc>) -> Result<ObservationRecord> {
        let eq = self.provider.equatorial(body, t)?;
        let hz = self.provider.horizontal(self.site, body, t)?;

        Ok(ObservationRecord {
            time: t,
            body: body.name().to_string(),
            ra: angle::encode(eq.ra_hours, AngleKind::RightAscension),
            dec: angle::encode(eq.dec_deg, AngleKind::Declination),
            distance_au: eq.distance_au,
            altitude_deg: hz.alt_deg,
            azimuth_deg: hz.az_deg,
        })
    }
}
