//! Lumped element primitives for equivalent-circuit models.
//!
//! Every element exposes a frequency-domain impedance at an angular
//! frequency ω in rad/s. The CPE and Warburg expressions carry negative
//! powers of ω, so ω must be strictly positive; sweeps constructed through
//! [`crate::sweep::FrequencySweep`] guarantee that.

use num_complex::Complex;

use crate::math::{jomega_pow, CScalar, Scalar};

/// Lumped resistor model.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistor {
    resistance: Scalar,
}

impl Resistor {
    /// Creates a resistor with `resistance_ohms` in ohms.
    #[must_use]
    pub const fn new(resistance_ohms: Scalar) -> Self {
        Self {
            resistance: resistance_ohms,
        }
    }

    /// Resistance magnitude in ohms.
    #[must_use]
    pub const fn resistance(&self) -> Scalar {
        self.resistance
    }

    /// Frequency-independent impedance `R + 0j`.
    #[must_use]
    pub fn impedance(&self, _omega: Scalar) -> CScalar {
        Complex::new(self.resistance, 0.0)
    }
}

/// Lumped capacitor model (ideal).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacitor {
    capacitance: Scalar,
}

impl Capacitor {
    /// Creates a capacitor with `capacitance_f` in farads.
    #[must_use]
    pub const fn new(capacitance_f: Scalar) -> Self {
        Self {
            capacitance: capacitance_f,
        }
    }

    /// Capacitance magnitude in farads.
    #[must_use]
    pub const fn capacitance(&self) -> Scalar {
        self.capacitance
    }

    /// Impedance `-j / (ωC)` for ω > 0.
    #[must_use]
    pub fn impedance(&self, omega: Scalar) -> CScalar {
        Complex::new(0.0, -1.0 / (omega * self.capacitance))
    }
}

/// Constant-phase element modeling a distributed, non-ideal double layer.
///
/// The dispersion exponent `n` interpolates between an ideal resistor
/// (`n = 0`) and an ideal capacitor (`n = 1`); fuel-cell fits typically sit
/// near 0.9.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cpe {
    q: Scalar,
    n: Scalar,
}

impl Cpe {
    /// Creates a CPE with pseudo-capacitance `q` (S·s^n) and exponent `n`.
    #[must_use]
    pub const fn new(q: Scalar, n: Scalar) -> Self {
        Self { q, n }
    }

    /// Pseudo-capacitance magnitude in S·s^n.
    #[must_use]
    pub const fn q(&self) -> Scalar {
        self.q
    }

    /// Dispersion exponent.
    #[must_use]
    pub const fn n(&self) -> Scalar {
        self.n
    }

    /// Impedance `1 / (Q · (jω)^n)` on the principal branch, for ω > 0.
    #[must_use]
    pub fn impedance(&self, omega: Scalar) -> CScalar {
        Complex::new(1.0, 0.0) / (self.q * jomega_pow(omega, self.n))
    }
}

/// Semi-infinite Warburg diffusion element.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Warburg {
    sigma: Scalar,
}

impl Warburg {
    /// Creates a Warburg element with coefficient `sigma` in Ω·s^-1/2.
    #[must_use]
    pub const fn new(sigma: Scalar) -> Self {
        Self { sigma }
    }

    /// Warburg coefficient in Ω·s^-1/2.
    #[must_use]
    pub const fn sigma(&self) -> Scalar {
        self.sigma
    }

    /// Impedance `σ (1 - j) / sqrt(ω)` for ω > 0, a fixed -45° phasor.
    #[must_use]
    pub fn impedance(&self, omega: Scalar) -> CScalar {
        (self.sigma / omega.sqrt()) * Complex::new(1.0, -1.0)
    }
}

/// Impedance of two branches in parallel, via admittance addition.
#[must_use]
pub fn parallel(a: CScalar, b: CScalar) -> CScalar {
    let one = CScalar::new(1.0, 0.0);
    one / (one / a + one / b)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_4;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn resistor_impedance_is_real() {
        let r = Resistor::new(100.0);
        let z = r.impedance(1.0e3);
        assert_relative_eq!(z.re, 100.0);
        assert_relative_eq!(z.im, 0.0);
    }

    #[test]
    fn capacitor_impedance_is_reactive() {
        let c = Capacitor::new(1.0e-6);
        let omega = 1.0e3;
        let z = c.impedance(omega);
        assert_relative_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(z.im, -1.0e3, epsilon = 1.0e-9);
    }

    #[test]
    fn cpe_with_unit_exponent_is_an_ideal_capacitor() {
        let q = 2.5e-4;
        let cpe = Cpe::new(q, 1.0);
        let cap = Capacitor::new(q);
        for omega in [0.5, 10.0, 1.0e4] {
            let zc = cpe.impedance(omega);
            let zi = cap.impedance(omega);
            assert_relative_eq!(zc.re, zi.re, epsilon = 1.0e-12);
            assert_relative_eq!(zc.im, zi.im, max_relative = 1.0e-12);
        }
    }

    #[test]
    fn cpe_phase_is_minus_n_quarter_turns() {
        let cpe = Cpe::new(1.0e-3, 0.9);
        let z = cpe.impedance(200.0);
        assert_relative_eq!(z.arg().to_degrees(), -81.0, epsilon = 1.0e-9);
    }

    #[test]
    fn warburg_sits_at_minus_45_degrees() {
        let w = Warburg::new(5.0);
        let omega = 7.3;
        let z = w.impedance(omega);
        assert_relative_eq!(z.arg(), -FRAC_PI_4, epsilon = 1.0e-12);
        assert_relative_eq!(
            z.norm(),
            5.0 * 2.0_f64.sqrt() / omega.sqrt(),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn warburg_magnitude_decreases_with_frequency() {
        let w = Warburg::new(5.0);
        let norms: Vec<f64> = [0.1, 1.0, 10.0, 100.0, 1.0e4]
            .iter()
            .map(|&omega| w.impedance(omega).norm())
            .collect();
        for pair in norms.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn parallel_of_equal_resistances_halves() {
        let z = parallel(CScalar::new(50.0, 0.0), CScalar::new(50.0, 0.0));
        assert_relative_eq!(z.re, 25.0, epsilon = 1.0e-12);
        assert_relative_eq!(z.im, 0.0, epsilon = 1.0e-12);
    }
}
