//! Inertial / Earth-fixed frame transforms and observer geometry.
//!
//! Everything here is a pure function of time: no shared state is read
//! or written, all routines may run concurrently for independent instants.
use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::Deserialize;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, EARTH_ANGULAR_VEL_RAD_S, EARTH_SEMI_MAJOR_AXIS_KM,
    EARTH_SEMI_MINOR_AXIS_KM, JD_J2000, OMEGA_E, SECONDS_PER_DAY,
};

/// Convergence criterion of the geodetic latitude fixed-point
/// iteration, in radians.
const GEODETIC_LATITUDE_TOLERANCE_RAD: f64 = 1.0E-10;

/// Iteration cap of the geodetic latitude fixed-point iteration.
const GEODETIC_LATITUDE_MAX_ITER: usize = 10;

/// Reference Earth shape and rotation, supplied by the caller through
/// [crate::prelude::Config] so alternate ellipsoids can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Ellipsoid {
    /// Semi-major (equatorial) axis, in km
    pub semi_major_axis_km: f64,
    /// Flattening factor
    pub flattening: f64,
    /// Rotation rate, in rad/s
    pub rotation_rate_rad_s: f64,
}

impl Ellipsoid {
    /// WGS84 reference ellipsoid
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis_km: EARTH_SEMI_MAJOR_AXIS_KM,
        flattening: 1.0 - EARTH_SEMI_MINOR_AXIS_KM / EARTH_SEMI_MAJOR_AXIS_KM,
        rotation_rate_rad_s: EARTH_ANGULAR_VEL_RAD_S,
    };

    /// First eccentricity squared, f(2 - f)
    pub(crate) fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Position above the reference [Ellipsoid], rotating with Earth.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct GeodeticPosition {
    /// Latitude, in radians (positive north)
    pub latitude_rad: f64,
    /// Longitude, in radians (positive east)
    pub longitude_rad: f64,
    /// Altitude above the ellipsoid, in km
    pub altitude_km: f64,
}

impl GeodeticPosition {
    /// Builds Self from latitude [ddeg], longitude [ddeg]
    /// and altitude above the ellipsoid [km].
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64, altitude_km: f64) -> Self {
        Self {
            latitude_rad: latitude_deg.to_radians(),
            longitude_rad: longitude_deg.to_radians(),
            altitude_km,
        }
    }

    /// Latitude in decimal degrees
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_rad.to_degrees()
    }

    /// Longitude in decimal degrees
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_rad.to_degrees()
    }
}

/// Position and velocity in the Earth-centered inertial frame.
/// Transient: recomputed per queried instant, never mutated in place.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct InertialState {
    /// Position, in km
    pub position: Vector3<f64>,
    /// Velocity, in km.s⁻¹
    pub velocity: Vector3<f64>,
}

impl InertialState {
    /// Builds Self from position [km] and velocity [km/s] triplets,
    /// as returned by the propagation service.
    pub fn new(position_km: [f64; 3], velocity_km_s: [f64; 3]) -> Self {
        Self {
            position: Vector3::from(position_km),
            velocity: Vector3::from(velocity_km_s),
        }
    }
}

/// Target geometry as seen from a ground site, in the topocentric
/// South-East-Zenith frame.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct LookAngle {
    /// Azimuth, in radians within [0, 2π)
    pub azimuth_rad: f64,
    /// Elevation above the horizon, in radians. Negative below it.
    pub elevation_rad: f64,
    /// Range, in km
    pub range_km: f64,
    /// Range rate, in km.s⁻¹. Negative while approaching.
    pub range_rate_km_s: f64,
}

impl LookAngle {
    /// Azimuth in decimal degrees
    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth_rad.to_degrees()
    }

    /// Elevation in decimal degrees
    pub fn elevation_deg(&self) -> f64 {
        self.elevation_rad.to_degrees()
    }

    /// True while the target stands above the horizon
    pub fn above_horizon(&self) -> bool {
        self.elevation_rad > 0.0
    }
}

/// Ground observation site. Holds the site coordinates only:
/// the inertial counterpart is derived per queried instant,
/// so one snapshot serves a whole sweep.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Site coordinates
    pub site: GeodeticPosition,
}

impl Observer {
    /// Builds Self from site coordinates
    pub fn new(site: GeodeticPosition) -> Self {
        Self { site }
    }

    /// Returns the site [InertialState] at requested [Epoch].
    pub fn inertial_state(&self, t: Epoch, shape: &Ellipsoid) -> InertialState {
        geodetic_to_inertial(t, &self.site, shape)
    }

    /// Returns the [LookAngle] under which `target` is seen from this
    /// site at [Epoch] `t`. `target` must be expressed at the same instant.
    pub fn look_angle(&self, t: Epoch, target: &InertialState, shape: &Ellipsoid) -> LookAngle {
        let jd = t.to_jde_utc_days();
        let own = self.inertial_state(t, shape);

        let range = target.position - own.position;
        let range_vel = target.velocity - own.velocity;
        let range_mag = range.norm();

        let theta = lmst_jd(jd, self.site.longitude_rad);

        let (sin_lat, cos_lat) = self.site.latitude_rad.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();

        // rotate into the South-East-Zenith frame
        let top_s = sin_lat * cos_theta * range.x + sin_lat * sin_theta * range.y
            - cos_lat * range.z;
        let top_e = -sin_theta * range.x + cos_theta * range.y;
        let top_z = cos_lat * cos_theta * range.x + cos_lat * sin_theta * range.y
            + sin_lat * range.z;

        let mut azimuth = (-top_e / top_s).atan();
        if top_s > 0.0 {
            azimuth += PI;
        }
        if azimuth < 0.0 {
            azimuth += 2.0 * PI;
        }

        LookAngle {
            azimuth_rad: azimuth,
            elevation_rad: (top_z / range_mag).asin(),
            range_km: range_mag,
            range_rate_km_s: range.dot(&range_vel) / range_mag,
        }
    }
}

/// Greenwich Mean Sidereal Time at [Epoch] `t`,
/// in radians within [0, 2π).
pub fn gmst(t: Epoch) -> f64 {
    gmst_jd(t.to_jde_utc_days())
}

/// Local Mean Sidereal Time: [gmst] shifted by the site longitude
/// [radians], within [0, 2π).
pub fn lmst(t: Epoch, longitude_rad: f64) -> f64 {
    lmst_jd(t.to_jde_utc_days(), longitude_rad)
}

/// GMST from a julian date, per the 1992 Astronomical Almanac
/// (page B6) cubic polynomial.
pub(crate) fn gmst_jd(jd: f64) -> f64 {
    let ut = (jd + 0.5).fract();
    let jd0 = jd - ut;

    let tu = (jd0 - JD_J2000) / DAYS_PER_JULIAN_CENTURY;
    let gmst_s = 24110.54841 + tu * (8640184.812866 + tu * (0.093104 - tu * 6.2E-6));
    let gmst_s = (gmst_s + SECONDS_PER_DAY * OMEGA_E * ut).rem_euclid(SECONDS_PER_DAY);

    2.0 * PI * gmst_s / SECONDS_PER_DAY
}

pub(crate) fn lmst_jd(jd: f64, longitude_rad: f64) -> f64 {
    (gmst_jd(jd) + longitude_rad).rem_euclid(2.0 * PI)
}

/// Folds `value` into [min, max]
pub(crate) fn reduce(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    let full_ranges = ((max - value) / range).trunc();

    let reduced = value + full_ranges * range;
    if reduced > max {
        reduced - range
    } else {
        reduced
    }
}

/// Converts an Earth-fixed [GeodeticPosition] to its [InertialState]
/// at [Epoch] `t`. The velocity term is the analytic Earth rotation
/// contribution ω × r.
pub fn geodetic_to_inertial(t: Epoch, geo: &GeodeticPosition, shape: &Ellipsoid) -> InertialState {
    let jd = t.to_jde_utc_days();
    let theta = lmst_jd(jd, geo.longitude_rad);

    let a = shape.semi_major_axis_km;
    let f = shape.flattening;

    let (sin_lat, cos_lat) = geo.latitude_rad.sin_cos();

    let c = 1.0 / (1.0 + f * (f - 2.0) * sin_lat.powi(2)).sqrt();
    let s = (1.0 - f).powi(2) * c;
    let achcp = (a * c + geo.altitude_km) * cos_lat;

    let position = Vector3::new(
        achcp * theta.cos(),
        achcp * theta.sin(),
        (a * s + geo.altitude_km) * sin_lat,
    );

    let omega = shape.rotation_rate_rad_s;
    let velocity = Vector3::new(-omega * position.y, omega * position.x, 0.0);

    InertialState { position, velocity }
}

/// Converts an [InertialState] at [Epoch] `t` to the
/// [GeodeticPosition] of the subsatellite point. Latitude is solved by
/// fixed-point iteration with the first-eccentricity correction term.
pub fn inertial_to_geodetic(t: Epoch, state: &InertialState, shape: &Ellipsoid) -> GeodeticPosition {
    let jd = t.to_jde_utc_days();

    let a = shape.semi_major_axis_km;
    let e2 = shape.e2();

    let (x, y, z) = (state.position.x, state.position.y, state.position.z);

    let theta = y.atan2(x);
    let longitude_rad = reduce(theta - gmst_jd(jd), -PI, PI);

    let rho = (x.powi(2) + y.powi(2)).sqrt();

    let mut latitude_rad = z.atan2(rho);
    let mut c = 1.0;

    for _ in 0..GEODETIC_LATITUDE_MAX_ITER {
        let phi = latitude_rad;
        c = 1.0 / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        latitude_rad = (z + a * c * e2 * phi.sin()).atan2(rho);

        if (latitude_rad - phi).abs() < GEODETIC_LATITUDE_TOLERANCE_RAD {
            break;
        }
    }

    let altitude_km = rho / latitude_rad.cos() - a * c;

    if latitude_rad > PI / 2.0 {
        latitude_rad -= 2.0 * PI;
    }

    GeodeticPosition {
        latitude_rad,
        longitude_rad,
        altitude_km,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn t0() -> Epoch {
        Epoch::from_gregorian_utc(2020, 3, 15, 12, 0, 0, 0)
    }

    #[test]
    fn gmst_range() {
        for offset in 0..48 {
            let t = t0() + (offset as f64) * hifitime::Unit::Hour;
            let theta = gmst(t);
            assert!((0.0..2.0 * PI).contains(&theta), "gmst {} out of range", theta);
        }
    }

    #[test]
    fn lmst_folds_longitude() {
        let t = t0();
        let theta = lmst(t, -0.0076);
        assert!((0.0..2.0 * PI).contains(&theta));
    }

    #[test]
    fn reduce_folds() {
        // both range ends fold onto the inclusive upper bound
        assert!((reduce(3.0 * PI, -PI, PI) - PI).abs() < 1E-12);
        assert!((reduce(-3.0 * PI, -PI, PI) - PI).abs() < 1E-12);
        assert_eq!(reduce(0.5, -PI, PI), 0.5);
        // interior values fold modulo the range width
        assert!((reduce(2.5 * PI, -PI, PI) - 0.5 * PI).abs() < 1E-12);
        assert!((reduce(-2.5 * PI, -PI, PI) + 0.5 * PI).abs() < 1E-12);
    }

    #[rstest]
    #[case(51.4825, -0.0076, 0.006)]
    #[case(-33.8688, 151.2093, 0.058)]
    #[case(69.6492, 18.9553, 0.010)]
    #[case(0.0, -78.4678, 2.850)]
    fn geodetic_round_trip(#[case] lat_deg: f64, #[case] lon_deg: f64, #[case] alt_km: f64) {
        let t = t0();
        let shape = Ellipsoid::WGS84;

        let geo = GeodeticPosition::from_degrees(lat_deg, lon_deg, alt_km);
        let state = geodetic_to_inertial(t, &geo, &shape);
        let recovered = inertial_to_geodetic(t, &state, &shape);

        assert!(
            (recovered.latitude_rad - geo.latitude_rad).abs() < 1E-9,
            "latitude not recovered: {} vs {}",
            recovered.latitude_rad,
            geo.latitude_rad
        );
        assert!(
            (recovered.longitude_rad - geo.longitude_rad).abs() < 1E-9,
            "longitude not recovered: {} vs {}",
            recovered.longitude_rad,
            geo.longitude_rad
        );
        assert!(
            (recovered.altitude_km - geo.altitude_km).abs() < 1E-6,
            "altitude not recovered: {} vs {}",
            recovered.altitude_km,
            geo.altitude_km
        );
    }

    #[test]
    fn overhead_target_at_zenith() {
        let t = t0();
        let shape = Ellipsoid::WGS84;

        let site = GeodeticPosition::from_degrees(45.0, 7.0, 0.0);
        let observer = Observer::new(site);

        let overhead = GeodeticPosition {
            altitude_km: 400.0,
            ..site
        };
        let target = geodetic_to_inertial(t, &overhead, &shape);

        let look = observer.look_angle(t, &target, &shape);
        assert!(
            look.elevation_rad > 89.0_f64.to_radians(),
            "overhead target not at zenith: {}",
            look.elevation_deg()
        );
        assert!((look.range_km - 400.0).abs() < 1.0);
    }

    #[test]
    fn antipodal_target_below_horizon() {
        let t = t0();
        let shape = Ellipsoid::WGS84;

        let observer = Observer::new(GeodeticPosition::from_degrees(45.0, 7.0, 0.0));

        let antipode = GeodeticPosition::from_degrees(-45.0, -173.0, 400.0);
        let target = geodetic_to_inertial(t, &antipode, &shape);

        let look = observer.look_angle(t, &target, &shape);
        assert!(look.elevation_rad < 0.0);
        assert!(!look.above_horizon());
    }

    #[rstest]
    #[case(10.0, 20.0, 400.0)]
    #[case(80.0, -120.0, 850.0)]
    #[case(-60.0, 100.0, 1200.0)]
    fn look_angle_ranges(#[case] lat_deg: f64, #[case] lon_deg: f64, #[case] alt_km: f64) {
        let t = t0();
        let shape = Ellipsoid::WGS84;
        let observer = Observer::new(GeodeticPosition::from_degrees(48.85, 2.35, 0.035));

        let target =
            geodetic_to_inertial(t, &GeodeticPosition::from_degrees(lat_deg, lon_deg, alt_km), &shape);
        let look = observer.look_angle(t, &target, &shape);

        assert!((0.0..2.0 * PI).contains(&look.azimuth_rad));
        assert!((-PI / 2.0..=PI / 2.0).contains(&look.elevation_rad));
        assert!(look.range_km > 0.0);
    }

    #[test]
    fn wgs84_flattening() {
        let shape = Ellipsoid::WGS84;
        assert!((shape.flattening - 1.0 / 298.257).abs() < 1E-5);
        assert!((shape.e2() - 6.69437999E-3).abs() < 1E-9);
    }
}
