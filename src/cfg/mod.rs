//! Sweep and propagation parametrization
#[cfg(feature = "serde")]
use serde::Deserialize;

use hifitime::{Duration, Unit};

use crate::coords::Ellipsoid;

/// Gravity model forwarded to the external propagator at
/// initialization time.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum GravityModel {
    /// WGS72 constants: historical default, most published
    /// element sets are fitted against it.
    #[default]
    Wgs72,
    /// WGS84 constants.
    Wgs84,
}

/// Propagator operating mode, selecting the sidereal time model
/// used by deep-space corrections.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum OperatingMode {
    /// AFSPC compatibility mode, matching the reference
    /// implementation distributed by Space Track.
    #[default]
    Afspc,
    /// Improved IAU sidereal time model.
    Improved,
}

fn default_ellipsoid() -> Ellipsoid {
    Ellipsoid::WGS84
}

fn default_horizon() -> Duration {
    Duration::from_days(1.0)
}

fn default_min_elevation_deg() -> f64 {
    0.0
}

fn default_coarse_samples() -> u32 {
    20
}

fn default_max_root_iterations() -> u32 {
    30
}

fn default_elevation_tolerance_rad() -> f64 {
    1.0E-6
}

/// [Config] gathers everything the prediction sweep and the
/// propagator setup need. [Config::default] reproduces the behavior
/// of the original ground station suites: WGS72 constants, AFSPC mode,
/// 1 day horizon and no elevation filtering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Gravity model handed to the propagator.
    #[cfg_attr(feature = "serde", serde(default))]
    pub gravity_model: GravityModel,

    /// Propagator [OperatingMode].
    #[cfg_attr(feature = "serde", serde(default))]
    pub operating_mode: OperatingMode,

    /// Reference [Ellipsoid] used by all Earth-fixed transforms.
    /// Caller supplied so alternate Earth shapes can be evaluated,
    /// defaults to [Ellipsoid::WGS84].
    #[cfg_attr(feature = "serde", serde(default = "default_ellipsoid"))]
    pub ellipsoid: Ellipsoid,

    /// Prediction horizon, defaults to 1 day.
    #[cfg_attr(feature = "serde", serde(default = "default_horizon"))]
    pub horizon: Duration,

    /// Passes whose peak elevation (in degrees) lies below this
    /// threshold are filtered out of the sweep results. Defaults to 0°.
    #[cfg_attr(feature = "serde", serde(default = "default_min_elevation_deg"))]
    pub min_elevation_deg: f64,

    /// Coarse elevation samples per orbital period. 20 guarantees
    /// that no complete pass fits between two consecutive samples.
    #[cfg_attr(feature = "serde", serde(default = "default_coarse_samples"))]
    pub coarse_samples_per_period: u32,

    /// Regula falsi iteration cap when refining horizon crossings.
    #[cfg_attr(feature = "serde", serde(default = "default_max_root_iterations"))]
    pub max_root_iterations: u32,

    /// Regula falsi convergence criterion, on the elevation magnitude
    /// at the candidate crossing (radians).
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_elevation_tolerance_rad")
    )]
    pub elevation_tolerance_rad: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity_model: Default::default(),
            operating_mode: Default::default(),
            ellipsoid: default_ellipsoid(),
            horizon: default_horizon(),
            min_elevation_deg: default_min_elevation_deg(),
            coarse_samples_per_period: default_coarse_samples(),
            max_root_iterations: default_max_root_iterations(),
            elevation_tolerance_rad: default_elevation_tolerance_rad(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated horizon
    pub fn with_horizon(&self, horizon: Duration) -> Self {
        let mut s = self.clone();
        s.horizon = horizon;
        s
    }

    /// Copies and returns [Config] with updated elevation filter
    pub fn with_min_elevation_deg(&self, threshold: f64) -> Self {
        let mut s = self.clone();
        s.min_elevation_deg = threshold;
        s
    }

    /// Copies and returns [Config] with updated reference [Ellipsoid]
    pub fn with_ellipsoid(&self, ellipsoid: Ellipsoid) -> Self {
        let mut s = self.clone();
        s.ellipsoid = ellipsoid;
        s
    }

    /// Horizon length in days
    pub(crate) fn horizon_days(&self) -> f64 {
        self.horizon.to_unit(Unit::Day)
    }
}
