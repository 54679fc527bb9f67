//! Two-line element set parsing and validation.
use thiserror::Error;

use hifitime::{Epoch, Unit};

use crate::constants::{MINUTES_PER_DAY, REV_PER_DAY_TO_RAD_PER_MIN, SIDEREAL_DAY_WHOLE_MINUTES};

mod catalog;
pub use catalog::{Catalog, CatalogEntry};

use std::f64::consts::PI;

/// Element record validation / extraction errors.
/// Records failing any of these are skipped at the catalog and sweep
/// levels, they are never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TleError {
    /// Element lines span (at least) 69 columns.
    #[error("line {0}: shorter than 69 columns")]
    LineTooShort(u8),

    /// Element lines are plain ASCII: anything else breaks the
    /// fixed-column layout.
    #[error("line {0}: non-ASCII content")]
    NonAscii(u8),

    /// Lines open with their line number and a blank.
    #[error("line {0}: bad line identifier")]
    BadIdentifier(u8),

    /// Modulo-10 digit sum does not match column 69.
    #[error("line {0}: checksum mismatch")]
    Checksum(u8),

    /// A fixed-column field failed numeric extraction.
    #[error("line {line}: unparsable {field} field")]
    InvalidField { line: u8, field: &'static str },
}

/// Returns true if `line` passes the element line checksum rule:
/// over columns 1-68, digits count as themselves, '-' counts as one,
/// anything else (letters, blanks, '.', '+') as zero; the modulo-10
/// sum must equal the digit in column 69.
pub fn line_checksum_valid(line: &str) -> bool {
    checksum(line, 0).is_ok()
}

fn checksum(line: &str, line_number: u8) -> Result<(), TleError> {
    let bytes = line.as_bytes();

    if bytes.len() < 69 {
        return Err(TleError::LineTooShort(line_number));
    }

    // column positions are byte offsets: a multibyte character would
    // shift every field past it
    if !line.is_ascii() {
        return Err(TleError::NonAscii(line_number));
    }

    if (bytes[0] != b'1' && bytes[0] != b'2') || bytes[1] != b' ' {
        return Err(TleError::BadIdentifier(line_number));
    }

    let mut sum: u32 = 0;
    for byte in &bytes[..68] {
        match byte {
            b'0'..=b'9' => sum += (byte - b'0') as u32,
            b'-' => sum += 1,
            _ => {}
        }
    }

    if bytes[68].is_ascii_digit() && (sum % 10) as u8 == bytes[68] - b'0' {
        Ok(())
    } else {
        Err(TleError::Checksum(line_number))
    }
}

/// Extracts 1-indexed inclusive column range, trimmed
fn field(line: &str, start: usize, end: usize) -> &str {
    line[start - 1..end].trim()
}

fn parse_f64(line: &str, start: usize, end: usize, ln: u8, name: &'static str) -> Result<f64, TleError> {
    field(line, start, end)
        .parse::<f64>()
        .map_err(|_| TleError::InvalidField { line: ln, field: name })
}

fn parse_u32(line: &str, start: usize, end: usize, ln: u8, name: &'static str) -> Result<u32, TleError> {
    let f = field(line, start, end);
    if f.is_empty() {
        return Ok(0);
    }
    f.parse::<u32>()
        .map_err(|_| TleError::InvalidField { line: ln, field: name })
}

/// Decodes the assumed-decimal-point exponent notation used by the
/// 2nd mean motion derivative and BSTAR fields: a sign column, five
/// mantissa digits with implied leading "0.", and a two-column
/// power-of-ten exponent.
fn parse_exponent_field(line: &str, start: usize, ln: u8, name: &'static str) -> Result<f64, TleError> {
    let sign = if line.as_bytes()[start - 1] == b'-' {
        -1.0
    } else {
        1.0
    };

    let digits = field(line, start + 1, start + 5);
    let mantissa = if digits.is_empty() {
        0.0
    } else {
        digits
            .parse::<u32>()
            .map_err(|_| TleError::InvalidField { line: ln, field: name })? as f64
            / 1.0E5
    };

    let exponent = field(line, start + 6, start + 7);
    let exponent = if exponent.is_empty() {
        0
    } else {
        exponent
            .parse::<i32>()
            .map_err(|_| TleError::InvalidField { line: ln, field: name })?
    };

    Ok(sign * mantissa * 10.0_f64.powi(exponent))
}

/// Validated orbital element record, in propagation units:
/// angles in radians, mean motion and derivatives in rad/min powers,
/// epoch as a UTC [Epoch]. Built once per record and immutable:
/// selecting another satellite replaces the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    /// Display name, from the catalog name line
    pub name: String,
    /// Catalog number (kept textual: alpha-5 numbering)
    pub catalog_number: String,
    /// Security classification, 'U' for unclassified
    pub classification: char,
    /// International designator (launch year, number, piece)
    pub international_designator: String,
    /// Reference epoch of this element set
    pub epoch: Epoch,
    /// Mean motion, rad/min
    pub mean_motion: f64,
    /// Half of the first mean motion derivative, rad/min²
    pub mean_motion_dot: f64,
    /// Sixth of the second mean motion derivative, rad/min³
    pub mean_motion_ddot: f64,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination, radians
    pub inclination: f64,
    /// Right ascension of the ascending node, radians
    pub raan: f64,
    /// Argument of perigee, radians
    pub argument_of_perigee: f64,
    /// Mean anomaly at epoch, radians
    pub mean_anomaly: f64,
    /// BSTAR drag term
    pub bstar: f64,
    /// Ephemeris type
    pub ephemeris_type: u8,
    /// Element set number
    pub element_number: u32,
    /// Revolution number at epoch
    pub revolution_number: u32,
}

impl ElementSet {
    /// Parses and validates one record from its two 69-column lines.
    /// Both lines must pass the checksum rule independently.
    pub fn from_lines(name: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        checksum(line1, 1)?;
        checksum(line2, 2)?;

        if line1.as_bytes()[0] != b'1' {
            return Err(TleError::BadIdentifier(1));
        }
        if line2.as_bytes()[0] != b'2' {
            return Err(TleError::BadIdentifier(2));
        }

        let catalog_number = field(line1, 3, 7).to_string();
        let classification = line1.as_bytes()[7] as char;
        let international_designator = field(line1, 10, 17).to_string();

        let epoch_year = parse_u32(line1, 19, 20, 1, "epoch year")?;
        let epoch_days = parse_f64(line1, 21, 32, 1, "epoch day")?;

        let mean_motion_dot = parse_f64(line1, 34, 43, 1, "mean motion derivative")?;
        let mean_motion_ddot = parse_exponent_field(line1, 45, 1, "2nd mean motion derivative")?;
        let bstar = parse_exponent_field(line1, 54, 1, "bstar")?;

        let ephemeris_type = match line1.as_bytes()[62] {
            b'0'..=b'9' => line1.as_bytes()[62] - b'0',
            _ => 0,
        };
        let element_number = parse_u32(line1, 65, 68, 1, "element number")?;

        let inclination = parse_f64(line2, 9, 16, 2, "inclination")?;
        let raan = parse_f64(line2, 18, 25, 2, "raan")?;

        // implied leading "0."
        let eccentricity = parse_u32(line2, 27, 33, 2, "eccentricity")? as f64 / 1.0E7;

        let argument_of_perigee = parse_f64(line2, 35, 42, 2, "argument of perigee")?;
        let mean_anomaly = parse_f64(line2, 44, 51, 2, "mean anomaly")?;
        let mean_motion = parse_f64(line2, 53, 63, 2, "mean motion")?;
        let revolution_number = parse_u32(line2, 64, 68, 2, "revolution number")?;

        // two digit year convention
        let year = if epoch_year < 57 {
            epoch_year + 2000
        } else {
            epoch_year + 1900
        };

        let epoch =
            Epoch::from_gregorian_utc_at_midnight(year as i32, 1, 1) + (epoch_days - 1.0) * Unit::Day;

        Ok(Self {
            name: name.trim().to_string(),
            catalog_number,
            classification,
            international_designator,
            epoch,
            // rev/day to rad/min, derivatives scaled by day powers
            mean_motion: mean_motion * REV_PER_DAY_TO_RAD_PER_MIN,
            mean_motion_dot: mean_motion_dot * REV_PER_DAY_TO_RAD_PER_MIN / MINUTES_PER_DAY,
            mean_motion_ddot: mean_motion_ddot * REV_PER_DAY_TO_RAD_PER_MIN
                / (MINUTES_PER_DAY * MINUTES_PER_DAY),
            eccentricity,
            inclination: inclination.to_radians(),
            raan: raan.to_radians(),
            argument_of_perigee: argument_of_perigee.to_radians(),
            mean_anomaly: mean_anomaly.to_radians(),
            bstar,
            ephemeris_type,
            element_number,
            revolution_number,
        })
    }

    /// Epoch mean motion in rev/day
    pub fn rev_per_day(&self) -> f64 {
        self.mean_motion / REV_PER_DAY_TO_RAD_PER_MIN
    }

    /// Orbital period in minutes
    pub fn period_minutes(&self) -> f64 {
        2.0 * PI / self.mean_motion
    }

    /// True when the period matches one sidereal day (integer-minute
    /// truncation): such vehicles never rise nor set and are skipped
    /// by the prediction sweep.
    pub fn is_geostationary(&self) -> bool {
        self.period_minutes() as i64 == SIDEREAL_DAY_WHOLE_MINUTES
    }

    /// Element epoch as a julian date
    pub(crate) fn epoch_jde(&self) -> f64 {
        self.epoch.to_jde_utc_days()
    }
}
