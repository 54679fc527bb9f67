//! Doppler correction of a tracked downlink.
use crate::constants::SPEED_OF_LIGHT_KM_S;
use crate::coords::LookAngle;

/// Doppler-corrected downlink frequency in Hz, from the live range
/// rate [km/s] and elevation [radians]. The correction only applies
/// while the vehicle stands above the horizon: below it the base
/// frequency is returned untouched.
pub fn corrected_frequency_hz(base_freq_hz: f64, range_rate_km_s: f64, elevation_rad: f64) -> f64 {
    if elevation_rad > 0.0 {
        base_freq_hz * (1.0 - range_rate_km_s / SPEED_OF_LIGHT_KM_S)
    } else {
        base_freq_hz
    }
}

/// [corrected_frequency_hz] from a topocentric [LookAngle]
pub fn corrected_downlink_hz(base_freq_hz: f64, look: &LookAngle) -> f64 {
    corrected_frequency_hz(base_freq_hz, look.range_rate_km_s, look.elevation_rad)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    const NOAA15_DOWNLINK_HZ: f64 = 137.620E6;

    #[test]
    fn approaching_raises_frequency() {
        let corrected = corrected_frequency_hz(NOAA15_DOWNLINK_HZ, -6.5, 0.4);
        assert!(corrected > NOAA15_DOWNLINK_HZ);
        // |shift| stays within a sane LEO budget (< 10 kHz at 137 MHz)
        assert!(corrected - NOAA15_DOWNLINK_HZ < 10_000.0);
    }

    #[test]
    fn receding_lowers_frequency() {
        let corrected = corrected_frequency_hz(NOAA15_DOWNLINK_HZ, 6.5, 0.4);
        assert!(corrected < NOAA15_DOWNLINK_HZ);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.2)]
    fn below_horizon_is_identity(#[case] elevation_rad: f64) {
        assert_eq!(
            corrected_frequency_hz(NOAA15_DOWNLINK_HZ, -6.5, elevation_rad),
            NOAA15_DOWNLINK_HZ,
        );
    }

    #[test]
    fn overhead_crossing_is_symmetric() {
        let up = corrected_frequency_hz(NOAA15_DOWNLINK_HZ, -3.0, 1.0);
        let down = corrected_frequency_hz(NOAA15_DOWNLINK_HZ, 3.0, 1.0);
        assert!((up - NOAA15_DOWNLINK_HZ - (NOAA15_DOWNLINK_HZ - down)).abs() < 1E-6);
    }
}
