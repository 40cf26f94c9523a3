//! Error types for chart input handling.
//!
//! The geometry itself never fails: missing data yields empty results.
//! Errors only come from parsing provider output and user configuration.

use thiserror::Error;

/// Errors from parsing ephemeris data or chart configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// Ephemeris response was not valid JSON or had the wrong shape.
    #[error("ephemeris JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Aspect name not present in the catalog.
    #[error("unknown aspect: {0:?}")]
    UnknownAspect(String),
    /// Orb override that is negative or not a number.
    #[error("invalid orb for {aspect}: {value}")]
    InvalidOrb { aspect: &'static str, value: f64 },
    /// Birth request field out of range.
    #[error("invalid birth data: {0}")]
    InvalidBirthData(&'static str),
}
