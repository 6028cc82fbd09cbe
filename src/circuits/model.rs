//! Equivalent-circuit models for fuel-cell impedance spectra.
//!
//! Two closed-form topologies are supported, one per degradation family:
//! an RC-CPE circuit for kinetically limited cells and a Randles circuit
//! with a semi-infinite Warburg tail for mass-transfer limited cells. The
//! topology is an explicit enum tag fixed at construction, so dispatch never
//! depends on which parameters happen to be present.

use crate::circuits::element::{parallel, Capacitor, Cpe, Resistor, Warburg};
use crate::errors::{EisError, Result};
use crate::math::{angular_frequency, CScalar, Scalar};
use crate::sweep::FrequencySweep;

fn require_positive(name: &'static str, value: Scalar) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EisError::InvalidParameter {
            name,
            value,
            constraint: "must be finite and positive",
        })
    }
}

fn require_unit_interval(name: &'static str, value: Scalar) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(EisError::InvalidParameter {
            name,
            value,
            constraint: "must lie in (0, 1]",
        })
    }
}

/// Closed-form equivalent circuit with its parameters.
///
/// All resistances are in ohms, capacitances in farads, the CPE
/// pseudo-capacitance in S·s^n, and the Warburg coefficient in Ω·s^-1/2.
/// The checked constructors [`Self::rc_cpe`] and [`Self::randles_warburg`]
/// are the intended entry points; literal construction skips validation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitModel {
    /// Ohmic resistance in series with a charge-transfer resistance
    /// shunted by a constant-phase element:
    /// `Z(ω) = R_ohmic + (1/R_ct + Q (jω)^n)⁻¹`.
    RcCpe {
        /// Series ohmic resistance (membrane plus contacts).
        r_ohmic: Scalar,
        /// Charge-transfer resistance of the electrode reaction.
        r_ct: Scalar,
        /// CPE pseudo-capacitance.
        q: Scalar,
        /// CPE dispersion exponent, in (0, 1].
        n: Scalar,
    },
    /// Randles circuit with an ideal double layer and a semi-infinite
    /// Warburg diffusion tail:
    /// `Z(ω) = R_ohmic + (1/R_ct + jωC_dl)⁻¹ + σ (1 - j) / sqrt(ω)`.
    RandlesWarburg {
        /// Series ohmic resistance.
        r_ohmic: Scalar,
        /// Charge-transfer resistance.
        r_ct: Scalar,
        /// Ideal double-layer capacitance.
        c_dl: Scalar,
        /// Warburg coefficient.
        sigma: Scalar,
    },
}

impl CircuitModel {
    /// Creates a validated RC-CPE model.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::InvalidParameter`] when any parameter is
    /// non-positive or non-finite, or when `n` exceeds 1.
    pub fn rc_cpe(r_ohmic: Scalar, r_ct: Scalar, q: Scalar, n: Scalar) -> Result<Self> {
        let model = Self::RcCpe { r_ohmic, r_ct, q, n };
        model.validate()?;
        Ok(model)
    }

    /// Creates a validated Randles-Warburg model.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::InvalidParameter`] when any parameter is
    /// non-positive or non-finite.
    pub fn randles_warburg(
        r_ohmic: Scalar,
        r_ct: Scalar,
        c_dl: Scalar,
        sigma: Scalar,
    ) -> Result<Self> {
        let model = Self::RandlesWarburg { r_ohmic, r_ct, c_dl, sigma };
        model.validate()?;
        Ok(model)
    }

    /// Checks every parameter against its physical range.
    ///
    /// # Errors
    ///
    /// Returns [`EisError::InvalidParameter`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RcCpe { r_ohmic, r_ct, q, n } => {
                require_positive("R_ohmic", *r_ohmic)?;
                require_positive("R_ct", *r_ct)?;
                require_positive("Q", *q)?;
                require_unit_interval("n", *n)
            }
            Self::RandlesWarburg { r_ohmic, r_ct, c_dl, sigma } => {
                require_positive("R_ohmic", *r_ohmic)?;
                require_positive("R_ct", *r_ct)?;
                require_positive("C_dl", *c_dl)?;
                require_positive("sigma", *sigma)
            }
        }
    }

    /// Series ohmic resistance of either topology, in ohms.
    #[must_use]
    pub const fn r_ohmic(&self) -> Scalar {
        match self {
            Self::RcCpe { r_ohmic, .. } | Self::RandlesWarburg { r_ohmic, .. } => *r_ohmic,
        }
    }

    /// Charge-transfer resistance of either topology, in ohms.
    #[must_use]
    pub const fn r_ct(&self) -> Scalar {
        match self {
            Self::RcCpe { r_ct, .. } | Self::RandlesWarburg { r_ct, .. } => *r_ct,
        }
    }

    /// Complex impedance at angular frequency `omega` in rad/s.
    ///
    /// `omega` must be strictly positive; evaluation through a
    /// [`FrequencySweep`] guarantees that.
    #[must_use]
    pub fn impedance(&self, omega: Scalar) -> CScalar {
        match self {
            Self::RcCpe { r_ohmic, r_ct, q, n } => {
                let faradaic = parallel(
                    Resistor::new(*r_ct).impedance(omega),
                    Cpe::new(*q, *n).impedance(omega),
                );
                Resistor::new(*r_ohmic).impedance(omega) + faradaic
            }
            Self::RandlesWarburg { r_ohmic, r_ct, c_dl, sigma } => {
                let faradaic = parallel(
                    Resistor::new(*r_ct).impedance(omega),
                    Capacitor::new(*c_dl).impedance(omega),
                );
                Resistor::new(*r_ohmic).impedance(omega)
                    + faradaic
                    + Warburg::new(*sigma).impedance(omega)
            }
        }
    }

    /// Evaluates the model across a sweep, one impedance per frequency, in
    /// sweep order. With the `rayon` feature the points are computed in
    /// parallel; ordering is unchanged.
    #[must_use]
    pub fn sweep_impedance(&self, sweep: &FrequencySweep) -> Vec<CScalar> {
        self.sweep_impl(sweep.frequencies())
    }

    #[cfg(feature = "rayon")]
    fn sweep_impl(&self, frequencies: &[Scalar]) -> Vec<CScalar> {
        use rayon::prelude::*;
        frequencies
            .par_iter()
            .map(|&f| self.impedance(angular_frequency(f)))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn sweep_impl(&self, frequencies: &[Scalar]) -> Vec<CScalar> {
        frequencies
            .iter()
            .map(|&f| self.impedance(angular_frequency(f)))
            .collect()
    }
}

/// RC-CPE impedance across a sweep. Convenience wrapper over
/// [`CircuitModel::rc_cpe`] plus [`CircuitModel::sweep_impedance`].
///
/// # Errors
///
/// Returns [`EisError::InvalidParameter`] for out-of-range parameters.
pub fn impedance_rc_cpe(
    sweep: &FrequencySweep,
    r_ohmic: Scalar,
    r_ct: Scalar,
    q: Scalar,
    n: Scalar,
) -> Result<Vec<CScalar>> {
    Ok(CircuitModel::rc_cpe(r_ohmic, r_ct, q, n)?.sweep_impedance(sweep))
}

/// Randles-Warburg impedance across a sweep. Convenience wrapper over
/// [`CircuitModel::randles_warburg`] plus [`CircuitModel::sweep_impedance`].
///
/// # Errors
///
/// Returns [`EisError::InvalidParameter`] for out-of-range parameters.
pub fn impedance_warburg(
    sweep: &FrequencySweep,
    r_ohmic: Scalar,
    r_ct: Scalar,
    c_dl: Scalar,
    sigma: Scalar,
) -> Result<Vec<CScalar>> {
    Ok(CircuitModel::randles_warburg(r_ohmic, r_ct, c_dl, sigma)?.sweep_impedance(sweep))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::angular_frequency;

    fn baseline() -> CircuitModel {
        CircuitModel::rc_cpe(0.1, 0.5, 1.0e-3, 0.9).unwrap()
    }

    #[test]
    fn constructors_accept_reference_parameters() {
        assert!(CircuitModel::rc_cpe(0.1, 0.5, 1.0e-3, 0.9).is_ok());
        assert!(CircuitModel::randles_warburg(0.1, 0.5, 1.0e-3, 5.0).is_ok());
    }

    #[test]
    fn unit_exponent_is_accepted() {
        assert!(CircuitModel::rc_cpe(0.1, 0.5, 1.0e-3, 1.0).is_ok());
    }

    #[test]
    fn nonpositive_parameters_are_rejected() {
        assert!(CircuitModel::rc_cpe(0.0, 0.5, 1.0e-3, 0.9).is_err());
        assert!(CircuitModel::rc_cpe(0.1, -0.5, 1.0e-3, 0.9).is_err());
        assert!(CircuitModel::rc_cpe(0.1, 0.5, f64::NAN, 0.9).is_err());
        assert!(CircuitModel::randles_warburg(0.1, 0.5, 0.0, 5.0).is_err());
        assert!(CircuitModel::randles_warburg(0.1, 0.5, 1.0e-3, f64::INFINITY).is_err());
    }

    #[test]
    fn dispersion_exponent_is_capped_at_one() {
        let err = CircuitModel::rc_cpe(0.1, 0.5, 1.0e-3, 1.2).unwrap_err();
        assert!(matches!(err, EisError::InvalidParameter { name: "n", .. }));
    }

    #[test]
    fn rc_cpe_matches_reference_value_at_10_khz() {
        let z = baseline().impedance(angular_frequency(1.0e4));
        assert_relative_eq!(z.re, 0.111_673_433_050_978, max_relative = 1.0e-9);
        assert_relative_eq!(z.im, -0.045_658_211_919_869, max_relative = 1.0e-9);
    }

    #[test]
    fn rc_cpe_approaches_r_ohmic_at_high_frequency() {
        // The CPE shorts the faradaic branch once Q·ω^n >> 1/R_ct.
        let z = baseline().impedance(angular_frequency(1.0e8));
        assert_relative_eq!(z.re, 0.1, epsilon = 1.0e-4);
        assert_relative_eq!(z.im, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn rc_cpe_approaches_total_resistance_at_low_frequency() {
        // Already within a few 1e-5 of R_ohmic + R_ct at the bottom of the
        // reference sweep, and numerically exact far below it.
        let z = baseline().impedance(angular_frequency(0.1));
        assert_relative_eq!(z.re, 0.6, epsilon = 1.0e-3);
        assert_relative_eq!(z.im, 0.0, epsilon = 1.0e-3);

        let z = baseline().impedance(angular_frequency(1.0e-9));
        assert_relative_eq!(z.re, 0.6, epsilon = 1.0e-9);
        assert_relative_eq!(z.im, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn warburg_matches_reference_value_at_low_frequency() {
        let model = CircuitModel::randles_warburg(0.1, 0.5, 1.0e-3, 5.0).unwrap();
        let z = model.impedance(angular_frequency(0.1));
        assert_relative_eq!(z.re, 6.907_831_255_702, max_relative = 1.0e-9);
        assert_relative_eq!(z.im, -6.307_988_384_668, max_relative = 1.0e-9);
    }

    #[test]
    fn topologies_disagree_away_from_the_asymptotes() {
        let kinetic = baseline();
        let diffusive = CircuitModel::randles_warburg(0.1, 0.5, 1.0e-3, 5.0).unwrap();
        let omega = angular_frequency(10.0);
        let dz = kinetic.impedance(omega) - diffusive.impedance(omega);
        assert!(dz.norm() > 0.1);
    }

    #[test]
    fn sweep_impedance_matches_pointwise_evaluation() {
        let sweep = FrequencySweep::log_spaced(0.5, 2.0e3, 17).unwrap();
        let model = baseline();
        let zs = model.sweep_impedance(&sweep);
        assert_eq!(zs.len(), sweep.len());
        for (f, z) in sweep.iter().zip(&zs) {
            let direct = model.impedance(angular_frequency(f));
            assert_relative_eq!(z.re, direct.re, max_relative = 1.0e-12);
            assert_relative_eq!(z.im, direct.im, max_relative = 1.0e-12);
        }
    }

    #[test]
    fn sweep_wrappers_propagate_validation_errors() {
        let sweep = FrequencySweep::reference();
        assert!(impedance_rc_cpe(&sweep, 0.1, 0.5, 1.0e-3, 0.0).is_err());
        assert!(impedance_warburg(&sweep, -0.1, 0.5, 1.0e-3, 5.0).is_err());
        let zs = impedance_rc_cpe(&sweep, 0.1, 0.5, 1.0e-3, 0.9).unwrap();
        assert_eq!(zs.len(), sweep.len());
    }
}
