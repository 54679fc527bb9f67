use thiserror::Error;

use crate::tle::TleError;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed element record (bad checksum or field encoding).
    /// At the catalog and sweep levels these are skipped, never fatal.
    #[error("malformed element record: {0}")]
    Tle(#[from] TleError),

    /// The external propagator rejected the element set at
    /// initialization (eccentricity out of range, negative mean motion,
    /// Kozai mean motion recovery failure..). Marks the record unusable
    /// for the current sweep.
    #[error("propagator initialization: {0}")]
    Initialization(#[from] sgp4::ElementsError),

    /// The external propagator failed while stepping (decaying
    /// perturbations..). Aborts the current satellite scan only:
    /// passes already completed for other satellites are retained.
    #[error("propagation error: {0}")]
    Propagation(#[from] sgp4::Error),

    /// Element catalog is missing or unreadable. Surfaced to the caller:
    /// a partial catalog is never assumed usable.
    #[error("catalog resource unavailable: {0}")]
    ResourceUnavailable(#[from] std::io::Error),
}
