//! Revolution numbering.
use std::f64::consts::PI;

use hifitime::Epoch;

use crate::constants::{MINUTES_PER_DAY, REV_PER_DAY_TO_RAD_PER_MIN};
use crate::tle::ElementSet;

/// Revolution number of the vehicle at [Epoch] `t`: the revolution
/// counter at epoch advanced by the completed fraction of the epoch
/// revolution and by the mean motion, decay corrected through the
/// element set derivative terms. Pure function of (time, elements).
pub fn orbit_number(t: Epoch, elements: &ElementSet) -> i64 {
    let dt_days = t.to_jde_utc_days() - elements.epoch.to_jde_utc_days();

    // back to rev/day powers
    let mean_motion = elements.rev_per_day();
    let decay_rate = elements.mean_motion_dot * MINUTES_PER_DAY / REV_PER_DAY_TO_RAD_PER_MIN;
    let decay_rate_dot =
        elements.mean_motion_ddot * MINUTES_PER_DAY * MINUTES_PER_DAY / REV_PER_DAY_TO_RAD_PER_MIN;

    // stored terms are half and sixth of the derivatives
    let current_motion = mean_motion + 2.0 * decay_rate * dt_days + 6.0 * decay_rate_dot * dt_days.powi(2);

    let reference = elements.revolution_number as f64 + elements.mean_anomaly / (2.0 * PI);

    (reference + current_motion * dt_days) as i64
}
