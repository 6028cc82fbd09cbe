//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum EisError {
    /// Raised when a frequency sweep contains non-positive or non-finite samples.
    #[error("invalid frequency sweep: {0}")]
    InvalidSweep(String),
    /// Raised when an equivalent-circuit parameter is out of its physical range.
    #[error("invalid circuit parameter: {name} = {value} ({constraint})")]
    InvalidParameter {
        /// Parameter symbol, e.g. `R_ct`.
        name: &'static str,
        /// Offending value.
        value: Scalar,
        /// Constraint the value violated.
        constraint: &'static str,
    },
    /// Raised when a scenario name is registered twice in one catalog.
    #[error("duplicate scenario name: {0}")]
    DuplicateScenario(String),
    /// Raised when a lookup names a scenario the dataset does not contain.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
    /// Raised when a dataset offers no baseline curve to compare against.
    #[error("dataset contains no baseline scenario")]
    MissingBaseline,
    /// Raised when parameter estimation is asked to read an empty curve.
    #[error("impedance curve for scenario `{0}` has no samples")]
    EmptyCurve(String),
    /// Wraps filesystem and stream errors from exports.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Raised when chart rendering fails.
    #[error("failed to render plot: {0}")]
    Plot(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for EisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Plot(value.to_string())
    }
}

/// Convenience alias used by fallible operations throughout the crate.
pub type Result<T> = std::result::Result<T, EisError>;
