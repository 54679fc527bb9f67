//! Orbital propagation seam.
//!
//! Propagation itself is consumed as a black-box service: the crate
//! describes what it needs through [Propagator] and adapts the `sgp4`
//! crate behind it. Any nonzero propagation diagnostic is surfaced,
//! never swallowed: the sweep treats it as "abort this satellite".
use hifitime::Epoch;

use crate::cfg::{GravityModel, OperatingMode};
use crate::constants::{DAYS_PER_JULIAN_YEAR, JD_J2000};
use crate::coords::InertialState;
use crate::error::Error;
use crate::tle::ElementSet;

/// Propagation service contract: inertial state at a requested
/// offset from the element set epoch.
pub trait Propagator {
    /// Returns the [InertialState] (km, km/s, inertial frame) at
    /// `minutes` since the element epoch. Errors mark the element set
    /// unusable for the remainder of the current sweep.
    fn state_at(&self, minutes_since_epoch: f64) -> Result<InertialState, Error>;
}

/// SGP4/SDP4 propagation of a validated [ElementSet], through the
/// `sgp4` crate. Initialization runs the full element sanity checks
/// of the underlying theory (eccentricity range, mean motion sign..):
/// a record that passes parsing can still be rejected here.
pub struct Sgp4Propagator {
    epoch: Epoch,
    constants: sgp4::Constants,
}

impl Sgp4Propagator {
    /// Initializes propagation constants for this [ElementSet],
    /// under the requested [GravityModel] and [OperatingMode].
    pub fn new(
        gravity_model: GravityModel,
        operating_mode: OperatingMode,
        elements: &ElementSet,
    ) -> Result<Self, Error> {
        let geopotential = match gravity_model {
            GravityModel::Wgs72 => sgp4::WGS72,
            GravityModel::Wgs84 => sgp4::WGS84,
        };

        let orbit_0 = sgp4::Orbit::from_kozai_elements(
            &geopotential,
            elements.inclination,
            elements.raan,
            elements.eccentricity,
            elements.argument_of_perigee,
            elements.mean_anomaly,
            elements.mean_motion,
        )
        .map_err(sgp4::ElementsError::from)?;

        // years since J2000, the epoch convention of the sgp4 crate
        let epoch_years = (elements.epoch.to_jde_utc_days() - JD_J2000) / DAYS_PER_JULIAN_YEAR;

        let constants = match operating_mode {
            OperatingMode::Afspc => sgp4::Constants::new(
                geopotential,
                sgp4::afspc_epoch_to_sidereal_time,
                epoch_years,
                elements.bstar,
                orbit_0,
            )
            .map_err(sgp4::ElementsError::from)?,
            OperatingMode::Improved => sgp4::Constants::new(
                geopotential,
                sgp4::iau_epoch_to_sidereal_time,
                epoch_years,
                elements.bstar,
                orbit_0,
            )
            .map_err(sgp4::ElementsError::from)?,
        };

        Ok(Self {
            epoch: elements.epoch,
            constants,
        })
    }

    /// Element set reference [Epoch]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
}

impl Propagator for Sgp4Propagator {
    fn state_at(&self, minutes_since_epoch: f64) -> Result<InertialState, Error> {
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))?;

        Ok(InertialState::new(prediction.position, prediction.velocity))
    }
}
