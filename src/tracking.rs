//! Live tracking of a single vehicle.
use hifitime::{Epoch, Unit};

use crate::cfg::Config;
use crate::coords::{
    inertial_to_geodetic, Ellipsoid, GeodeticPosition, LookAngle, Observer,
};
use crate::doppler::corrected_downlink_hz;
use crate::error::Error;
use crate::orbit::orbit_number;
use crate::propagator::{Propagator, Sgp4Propagator};
use crate::tle::ElementSet;

/// Snapshot of one tracked vehicle at one instant, as rendered by a
/// tracking display: pointing, footprint, revolution counter and the
/// tuned downlink.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingState {
    /// Instant of this snapshot
    pub time: Epoch,
    /// Topocentric pointing from the observer site
    pub look: LookAngle,
    /// Sub-satellite point (footprint center)
    pub subpoint: GeodeticPosition,
    /// Revolution counter at this instant
    pub orbit_number: i64,
    /// Doppler corrected downlink in Hz. Equal to the base frequency
    /// while the vehicle sits below the horizon.
    pub downlink_hz: f64,
}

/// [Tracker] follows one element set from one site: it owns its
/// initialized propagation constants and evaluates [TrackingState]
/// on demand, typically once per display refresh.
pub struct Tracker {
    elements: ElementSet,
    propagator: Sgp4Propagator,
    observer: Observer,
    ellipsoid: Ellipsoid,
    downlink_hz: f64,
}

impl Tracker {
    /// Builds a [Tracker] for this element set, observed from `site`,
    /// correcting `downlink_hz`. Fails when propagation constants
    /// cannot be initialized from the elements.
    pub fn new(
        cfg: &Config,
        elements: ElementSet,
        site: GeodeticPosition,
        downlink_hz: f64,
    ) -> Result<Self, Error> {
        let propagator = Sgp4Propagator::new(cfg.gravity_model, cfg.operating_mode, &elements)?;

        Ok(Self {
            elements,
            propagator,
            observer: Observer::new(site),
            ellipsoid: cfg.ellipsoid,
            downlink_hz,
        })
    }

    /// Name of the tracked vehicle
    pub fn name(&self) -> &str {
        &self.elements.name
    }

    /// Complete [TrackingState] at [Epoch] `t`
    pub fn state_at(&self, t: Epoch) -> Result<TrackingState, Error> {
        let minutes = (t - self.propagator.epoch()).to_unit(Unit::Minute);
        let state = self.propagator.state_at(minutes)?;

        let look = self.observer.look_angle(t, &state, &self.ellipsoid);
        let subpoint = inertial_to_geodetic(t, &state, &self.ellipsoid);

        Ok(TrackingState {
            time: t,
            look,
            subpoint,
            orbit_number: orbit_number(t, &self.elements),
            downlink_hz: corrected_downlink_hz(self.downlink_hz, &look),
        })
    }
}
