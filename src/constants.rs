use std::f64::consts::PI;

/// Speed of light, in km.s⁻¹
pub const SPEED_OF_LIGHT_KM_S: f64 = 2.99792458E5;

/// Earth angular velocity, in rad/s (WGS84 frame)
pub const EARTH_ANGULAR_VEL_RAD_S: f64 = 7.292115E-5;

/// WGS84 Earth ellipsoid semi-major axis (km)
pub const EARTH_SEMI_MAJOR_AXIS_KM: f64 = 6378.137;

/// WGS84 Earth ellipsoid semi-minor axis (km)
pub const EARTH_SEMI_MINOR_AXIS_KM: f64 = 6356.752314245;

/// Earth rotations per sidereal day
pub const OMEGA_E: f64 = 1.00273790934;

/// Minutes per day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// rev/day to rad/min conversion factor
pub const REV_PER_DAY_TO_RAD_PER_MIN: f64 = (2.0 * PI) / MINUTES_PER_DAY;

/// J2000 reference, as a julian date
pub const JD_J2000: f64 = 2451545.0;

/// Days per julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

/// Days per julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Whole minutes of one sidereal day (23h 56min 4.0905s = 1436.068175 min).
/// Orbital periods are compared to this value by integer truncation
/// when discarding geostationary vehicles.
pub(crate) const SIDEREAL_DAY_WHOLE_MINUTES: i64 = 1436;
