//! Frequency sweep construction and validation.
//!
//! Impedance expressions for the supported circuits diverge as ω → 0 (the
//! CPE and Warburg terms both carry negative powers of ω), so every sweep is
//! validated to contain strictly positive, finite frequencies before any
//! model is evaluated against it.

use crate::errors::{EisError, Result};
use crate::math::Scalar;

/// Lower bound of the reference sweep in hertz.
pub const REFERENCE_START_HZ: Scalar = 0.1;
/// Upper bound of the reference sweep in hertz.
pub const REFERENCE_STOP_HZ: Scalar = 1.0e4;
/// Number of samples in the reference sweep.
pub const REFERENCE_POINTS: usize = 100;

/// Generates `n` logarithmically spaced samples between `start_hz` and `stop_hz`.
/// Assumes both endpoints are strictly positive.
fn log_ladder(start_hz: Scalar, stop_hz: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start_hz],
        _ => {
            let log_start = start_hz.log10();
            let log_stop = stop_hz.log10();
            let step = (log_stop - log_start) / (n as Scalar - 1.0);
            (0..n)
                .map(|i| 10f64.powf(log_start + step * i as Scalar))
                .collect()
        }
    }
}

/// A validated grid of excitation frequencies in hertz.
///
/// Construction is the only validation boundary in the crate: once a sweep
/// exists, every frequency in it is finite and strictly positive, and model
/// evaluation downstream never re-checks.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySweep {
    frequencies: Vec<Scalar>,
}

impl FrequencySweep {
    /// Creates a logarithmically spaced sweep of `points` samples from
    /// `start_hz` to `stop_hz` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::InvalidSweep`] when either endpoint is zero,
    /// negative, or non-finite, or when `points` is zero.
    pub fn log_spaced(start_hz: Scalar, stop_hz: Scalar, points: usize) -> Result<Self> {
        if points == 0 {
            return Err(EisError::InvalidSweep(
                "sweep must contain at least one point".into(),
            ));
        }
        for (label, f) in [("start", start_hz), ("stop", stop_hz)] {
            if !f.is_finite() || f <= 0.0 {
                return Err(EisError::InvalidSweep(format!(
                    "{} frequency must be finite and positive, got {}",
                    label, f
                )));
            }
        }
        Ok(Self {
            frequencies: log_ladder(start_hz, stop_hz, points),
        })
    }

    /// Wraps an explicit frequency grid, in hertz, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::InvalidSweep`] when the grid is empty or any
    /// sample is zero, negative, or non-finite.
    pub fn from_frequencies(frequencies: Vec<Scalar>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(EisError::InvalidSweep(
                "sweep must contain at least one point".into(),
            ));
        }
        if let Some(f) = frequencies.iter().find(|f| !f.is_finite() || **f <= 0.0) {
            return Err(EisError::InvalidSweep(format!(
                "frequencies must be finite and positive, got {}",
                f
            )));
        }
        Ok(Self { frequencies })
    }

    /// The standard 0.1 Hz to 10 kHz decade sweep used by the reference
    /// scenario catalog: 100 points, log spaced.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            frequencies: log_ladder(REFERENCE_START_HZ, REFERENCE_STOP_HZ, REFERENCE_POINTS),
        }
    }

    /// Frequencies in hertz, in sweep order.
    #[must_use]
    pub fn frequencies(&self) -> &[Scalar] {
        &self.frequencies
    }

    /// Number of samples in the sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when the sweep holds no samples. Validated sweeps never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterates the frequencies in hertz, in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.frequencies.iter().copied()
    }
}
