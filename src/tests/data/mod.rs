//! Shared element set fixtures.
use crate::prelude::{Catalog, ElementSet, GeodeticPosition};
use std::io::BufReader;

/// ISS (ZARYA), 2008-09-20 epoch. Textbook record: both checksums
/// hold and the derivative fields are populated.
pub const ISS_NAME: &str = "ISS (ZARYA)";
pub const ISS_LINE1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

/// Synthetic geostationary record, same epoch day: whole-valued
/// sidereal period, near zero inclination and eccentricity.
pub const GEO_NAME: &str = "GEOSAT TEST";
pub const GEO_LINE1: &str = "1 33000U 08001A   08264.50000000  .00000012  00000-0  00000-0 0  1007";
pub const GEO_LINE2: &str = "2 33000   0.0168  93.0000 0001000   0.0000   0.0000  1.00273791 80004";

/// Mid-latitude reference site (southern England)
pub fn test_site() -> GeodeticPosition {
    GeodeticPosition::from_degrees(51.0, -1.0, 0.1)
}

pub fn iss_elements() -> ElementSet {
    ElementSet::from_lines(ISS_NAME, ISS_LINE1, ISS_LINE2)
        .unwrap_or_else(|e| panic!("ISS fixture rejected: {}", e))
}

/// Two-entry catalog: the ISS record followed by the geostationary
/// record, with blank separation lines as published catalogs have.
pub fn test_catalog() -> Catalog {
    let text = format!(
        "{}\n{}\n{}\n\n{}\n{}\n{}\n",
        ISS_NAME, ISS_LINE1, ISS_LINE2, GEO_NAME, GEO_LINE1, GEO_LINE2,
    );

    Catalog::from_reader(BufReader::new(text.as_bytes()))
        .unwrap_or_else(|e| panic!("catalog fixture rejected: {}", e))
}
