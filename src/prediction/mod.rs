//! Visibility window ("pass") prediction sweep.
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use itertools::Itertools;
use log::{debug, error, warn};

use hifitime::Epoch;

use crate::cfg::Config;
use crate::constants::MINUTES_PER_DAY;
use crate::coords::{GeodeticPosition, LookAngle, Observer};
use crate::error::Error;
use crate::propagator::{Propagator, Sgp4Propagator};
use crate::tle::{Catalog, ElementSet};

/// Cooperative cancellation signal shared between the sweep and its
/// caller. The sweep only reads it, at well defined safe points:
/// before scanning each satellite and before emitting each result.
#[derive(Default, Debug, Clone)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    /// New, not yet cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation: the sweep terminates cleanly at its
    /// next safe point, retaining fully computed results only.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    /// True once cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

/// One refined point of a pass: instant and look direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassPoint {
    /// Instant of this event
    pub time: Epoch,
    /// Azimuth, radians within [0, 2π)
    pub azimuth_rad: f64,
    /// Elevation, radians
    pub elevation_rad: f64,
}

/// One complete rise → peak → set visibility window.
///
/// `start < max < end` always holds, and `max` sits exactly halfway
/// between the refined crossings. The midpoint stands in for a true
/// elevation maximum search: a documented approximation of the
/// reference implementations, preserved so reported peak times match.
#[derive(Debug, Clone, PartialEq)]
pub struct PassEvent {
    /// Display name of the vehicle
    pub satellite: String,
    /// Rise: elevation crosses zero upwards
    pub start: PassPoint,
    /// Peak, at the exact midpoint of start and end
    pub max: PassPoint,
    /// Set: elevation crosses zero downwards
    pub end: PassPoint,
}

impl PassEvent {
    /// Peak elevation in decimal degrees, the quantity the sweep
    /// filter compares against [Config::min_elevation_deg].
    pub fn max_elevation_deg(&self) -> f64 {
        self.max.elevation_rad.to_degrees()
    }

    /// Above-horizon duration
    pub fn duration(&self) -> hifitime::Duration {
        self.end.time - self.start.time
    }
}

/// Horizon crossing direction between two consecutive elevation
/// samples, the single transition of the sweep state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Crossing {
    /// Below to above: a pass starts between the samples
    Rising,
    /// Above to below: the pending pass completes
    Falling,
}

/// Strict sign flip detection. Samples sitting exactly on the horizon
/// produce no transition, the next sample decides.
fn horizon_crossing(previous_elevation_rad: f64, elevation_rad: f64) -> Option<Crossing> {
    if previous_elevation_rad * elevation_rad < 0.0 {
        if previous_elevation_rad < elevation_rad {
            Some(Crossing::Rising)
        } else {
            Some(Crossing::Falling)
        }
    } else {
        None
    }
}

/// Regula falsi refinement of f(t) = 0 over the bracket [a, b],
/// f(a) and f(b) of opposite signs. Converges when |f(c)| falls under
/// `tolerance`, or gives the best candidate after `max_iterations`.
fn regula_falsi<F>(
    mut a: f64,
    mut b: f64,
    mut fa: f64,
    mut fb: f64,
    tolerance: f64,
    max_iterations: u32,
    f: F,
) -> Result<f64, Error>
where
    F: Fn(f64) -> Result<f64, Error>,
{
    let mut c = b;

    for _ in 0..max_iterations {
        c = b - fb * (b - a) / (fb - fa);

        let fc = f(c)?;
        if fc.abs() < tolerance {
            break;
        }

        if fa * fc < 0.0 {
            b = c;
            fb = fc;
        } else {
            a = c;
            fa = fc;
        }
    }

    Ok(c)
}

/// [Predictor] runs the visibility sweep: it drives repeated
/// propagate + transform + look-angle evaluations over the horizon
/// and collects refined [PassEvent]s, ranked by start time.
pub struct Predictor {
    /// Sweep parametrization
    pub cfg: Config,
    /// Element catalog the sweep selects from
    catalog: Catalog,
}

impl Predictor {
    /// Builds a [Predictor] over this [Catalog]
    pub fn new(cfg: Config, catalog: Catalog) -> Self {
        Self { cfg, catalog }
    }

    /// Read-only access to the underlying [Catalog]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Predicts the visibility windows of the selected satellites
    /// from `site`, over [Config::horizon] starting at `start`.
    ///
    /// Site coordinates and element sets are snapshot when the sweep
    /// begins. Names missing from the catalog, malformed records and
    /// per-satellite propagation failures are skipped (logged), they
    /// never abort the sweep. The returned list is filtered by
    /// [Config::min_elevation_deg] and ordered by start time.
    ///
    /// Long sweeps are meant to run off the interactive path: `token`
    /// cancels cooperatively, completed windows remain available.
    pub fn predict(
        &self,
        names: &[String],
        site: GeodeticPosition,
        start: Epoch,
        token: &CancelToken,
    ) -> Vec<PassEvent> {
        let observer = Observer::new(site);

        let mut events = Vec::new();

        for name in names {
            if token.is_cancelled() {
                warn!("sweep cancelled ({} satellites pending)", names.len());
                break;
            }

            let Some(entry) = self.catalog.get(name) else {
                warn!("\"{}\": not in catalog", name);
                continue;
            };

            match entry.elements() {
                Ok(elements) => {
                    events.extend(self.satellite_passes(&elements, &observer, start));
                },
                Err(e) => {
                    warn!("\"{}\": record skipped: {}", name, e);
                },
            }
        }

        let mut retained = Vec::with_capacity(events.len());

        for event in events
            .into_iter()
            .sorted_by(|a, b| a.start.time.cmp(&b.start.time))
        {
            if token.is_cancelled() {
                warn!("sweep cancelled while ranking results");
                break;
            }
            if event.max_elevation_deg() >= self.cfg.min_elevation_deg {
                retained.push(event);
            }
        }

        retained
    }

    /// Complete rise → set windows of one vehicle. Propagation errors
    /// abort the remainder of this scan only: windows already
    /// completed are returned.
    pub(crate) fn satellite_passes(
        &self,
        elements: &ElementSet,
        observer: &Observer,
        start: Epoch,
    ) -> Vec<PassEvent> {
        let mut events = Vec::new();

        if let Err(e) = self.scan(elements, observer, start, &mut events) {
            error!("\"{}\": scan aborted: {}", elements.name, e);
        }

        events
    }

    fn scan(
        &self,
        elements: &ElementSet,
        observer: &Observer,
        start: Epoch,
        events: &mut Vec<PassEvent>,
    ) -> Result<(), Error> {
        let propagator =
            Sgp4Propagator::new(self.cfg.gravity_model, self.cfg.operating_mode, elements)?;

        if elements.is_geostationary() {
            debug!("\"{}\": geostationary, no rise/set", elements.name);
            return Ok(());
        }

        let epoch_jd = elements.epoch_jde();
        let start_jd = start.to_jde_utc_days().max(epoch_jd);
        let end_jd = start.to_jde_utc_days() + self.cfg.horizon_days();

        // 20 samples per revolution leaves no room for a pass
        // to slip between two consecutive samples
        let step_days = 1.0 / elements.rev_per_day() / self.cfg.coarse_samples_per_period as f64;

        let look_at = |jd: f64| -> Result<LookAngle, Error> {
            let state = propagator.state_at((jd - epoch_jd) * MINUTES_PER_DAY)?;
            Ok(observer.look_angle(Epoch::from_jde_utc(jd), &state, &self.cfg.ellipsoid))
        };
        let elevation_at = |jd: f64| -> Result<f64, Error> { Ok(look_at(jd)?.elevation_rad) };

        let mut pending: Option<PassPoint> = None;
        let mut previous: Option<f64> = None;

        let mut jd = start_jd;
        while jd < end_jd {
            let elevation = elevation_at(jd)?;

            if let Some(previous) = previous {
                match horizon_crossing(previous, elevation) {
                    Some(Crossing::Rising) => {
                        let rise_jd = regula_falsi(
                            jd - step_days,
                            jd,
                            previous,
                            elevation,
                            self.cfg.elevation_tolerance_rad,
                            self.cfg.max_root_iterations,
                            elevation_at,
                        )?;
                        let look = look_at(rise_jd)?;

                        pending = Some(PassPoint {
                            time: Epoch::from_jde_utc(rise_jd),
                            azimuth_rad: look.azimuth_rad,
                            elevation_rad: look.elevation_rad,
                        });
                    },
                    Some(Crossing::Falling) => {
                        // a fall with no pending rise is ignored:
                        // the bracket densities make it unreachable
                        if let Some(rise) = pending.take() {
                            let set_jd = regula_falsi(
                                jd - step_days,
                                jd,
                                previous,
                                elevation,
                                self.cfg.elevation_tolerance_rad,
                                self.cfg.max_root_iterations,
                                elevation_at,
                            )?;
                            let set_look = look_at(set_jd)?;

                            let end = PassPoint {
                                time: Epoch::from_jde_utc(set_jd),
                                azimuth_rad: set_look.azimuth_rad,
                                elevation_rad: set_look.elevation_rad,
                            };

                            // peak taken at the exact midpoint,
                            // not a true maximum search
                            let max_time = rise.time + (end.time - rise.time) * 0.5;
                            let max_look = look_at(max_time.to_jde_utc_days())?;

                            if end.time > rise.time {
                                events.push(PassEvent {
                                    satellite: elements.name.clone(),
                                    start: rise,
                                    max: PassPoint {
                                        time: max_time,
                                        azimuth_rad: max_look.azimuth_rad,
                                        elevation_rad: max_look.elevation_rad,
                                    },
                                    end,
                                });
                            }
                        }
                    },
                    None => {},
                }
            }

            previous = Some(elevation);
            jd += step_days;
        }

        Ok(())
    }
}
