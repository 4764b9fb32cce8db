//! Periodic dashboard refresh: re-reads the observation log, decodes angle
//! text, filters by view state and regroups rows into per-body plot series.
//!
//! `build_frame` is pure so the whole read path can be tested without a
//! terminal; `RefreshController` adds the pause gate and the
//! waiting-for-data placeholder around it.

use crate::angle::{self, AngleKind};
use crate::observation::ObservationRecord;
use crate::state::ViewState;
use crate::store::Store;
use log::{info, warn};
use std::collections::HashMap;

/// Default seconds between dashboard refreshes; independent of (and free to
/// drift against) the sampler interval.
pub const DEFAULT_REFRESH_INTERVAL: u64 = 5;

/// Padding applied to the sky-map axis bounds, in RA hours and Dec degrees.
const RA_MARGIN: f64 = 1.0;
const DEC_MARGIN: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyBounds {
    /// [min, max] right ascension in hours, margin included.
    pub ra: [f64; 2],
    /// [min, max] declination in degrees, margin included.
    pub dec: [f64; 2],
}

/// Plot series for one body. The time panels use (unix seconds, degrees)
/// points for every row; `sky` holds only rows where both angles decoded.
#[derive(Clone, Debug, Default)]
pub struct BodySeries {
    pub body: String,
    pub altitude: Vec<(f64, f64)>,
    pub azimuth: Vec<(f64, f64)>,
    pub sky: Vec<(f64, f64)>,
}

/// Everything one refresh tick hands to the rendering surface. Replaces the
/// previous frame wholesale.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub bodies: Vec<BodySeries>,
    pub sky_bounds: Option<SkyBounds>,
}

/// Groups `rows` into per-body series, restricted to the active bodies,
/// preserving append order within each body.
pub fn build_frame(rows: &[ObservationRecord], view: &ViewState) -> Frame {
    let mut frame = Frame::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if !view.is_active(&row.body) {
            continue;
        }

        let ra = angle::decode(&row.ra, AngleKind::RightAscension);
        let dec = angle::decode(&row.dec, AngleKind::Declination);

        let slot = *index.entry(row.body.clone()).or_insert_with(|| {
            frame.bodies.push(BodySeries {
                body: row.body.clone(),
                ..BodySeries::default()
            });
            frame.bodies.len() - 1
        });
        let series = &mut frame.bodies[slot];

        let t = row.time.timestamp() as f64;
        series.altitude.push((t, row.altitude_deg));
        series.azimuth.push((t, row.azimuth_deg));
        // the sky map needs both angles; a row that decodes only one keeps
        // its altitude/azimuth points and drops out of this panel alone
        if let (Some(ra), Some(dec)) = (ra, dec) {
            series.sky.push((ra, dec));
        }
    }

    frame.sky_bounds = sky_bounds(&frame.bodies);
    frame
}

fn sky_bounds(bodies: &[BodySeries]) -> Option<SkyBounds> {
    let mut points = bodies.iter().flat_map(|series| series.sky.iter());
    let &(first_ra, first_dec) = points.next()?;

    let init = SkyBounds {
        ra: [first_ra, first_ra],
        dec: [first_dec, first_dec],
    };
    let bounds = points.fold(init, |mut b, &(ra, dec)| {
        b.ra = [b.ra[0].min(ra), b.ra[1].max(ra)];
        b.dec = [b.dec[0].min(dec), b.dec[1].max(dec)];
        b
    });

    Some(SkyBounds {
        ra: [bounds.ra[0] - RA_MARGIN, bounds.ra[1] + RA_MARGIN],
        dec: [bounds.dec[0] - DEC_MARGIN, bounds.dec[1] + DEC_MARGIN],
    })
}

/// Two-state (running/paused) refresh driver. Holds no file handle between
/// ticks; every tick reopens and re-reads the log through the store.
pub struct RefreshController<S> {
    store: S,
    frame: Option<Frame>,
}

impl<S: Store> RefreshController<S> {
    pub fn new(store: S) -> Self {
        RefreshController { store, frame: None }
    }

    /// The frame of the most recent running-state tick, `None` until data
    /// has arrived.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// One refresh tick. Paused: no load, no rebuild, the previous frame
    /// stands. Running: reload everything and replace the frame.
    pub fn tick(&mut self, view: &ViewState) {
        if view.paused() {
            return;
        }

        let rows = match self.store.load_all() {
            Ok(rows) => rows,
            Err(err) => {
                warn!("failed to load observation log: {:#}", err);
                return;
            }
        };
        if rows.is_empty() {
            info!("waiting for data, the observation log is empty");
            return;
        }

        let mut frame = build_frame(&rows, view);
        if frame.sky_bounds.is_none() {
            // nothing decoded on both axes this tick: keep the prior bounds
            frame.sky_bounds = self.frame.as_ref().and_then(|f| f.sky_bounds);
        }
        self.frame = Some(frame);
    }
}
