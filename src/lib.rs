#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod constants;
mod coords;
mod doppler;
mod error;
mod orbit;
mod prediction;
mod propagator;
mod tle;
mod tracking;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, GravityModel, OperatingMode};
    pub use crate::coords::{
        geodetic_to_inertial, gmst, inertial_to_geodetic, lmst, Ellipsoid, GeodeticPosition,
        InertialState, LookAngle, Observer,
    };
    pub use crate::doppler::{corrected_downlink_hz, corrected_frequency_hz};
    pub use crate::error::Error;
    pub use crate::orbit::orbit_number;
    pub use crate::prediction::{CancelToken, PassEvent, PassPoint, Predictor};
    pub use crate::propagator::{Propagator, Sgp4Propagator};
    pub use crate::tle::{line_checksum_valid, Catalog, CatalogEntry, ElementSet, TleError};
    pub use crate::tracking::{Tracker, TrackingState};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
