//! Shared numerical primitives for phasor arithmetic.

use std::f64::consts::PI;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for impedances.
pub type CScalar = num_complex::Complex<Scalar>;

/// Returns the angular frequency ω = 2πf corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: Scalar) -> Scalar {
    2.0 * PI * hz
}

/// Returns the complex exponential `e^(j * theta)` using `Scalar` precision.
#[must_use]
pub fn phasor(theta: Scalar) -> CScalar {
    CScalar::from_polar(1.0, theta)
}

/// Principal-branch complex power `(jω)^n` for ω > 0.
///
/// `jω` in polar form is `ω · e^(jπ/2)`, so the principal value is
/// `ω^n · e^(j n π/2)`. This is the branch electrochemistry texts use for
/// constant-phase elements.
#[must_use]
pub fn jomega_pow(omega: Scalar, n: Scalar) -> CScalar {
    CScalar::from_polar(omega.powf(n), n * PI / 2.0)
}
