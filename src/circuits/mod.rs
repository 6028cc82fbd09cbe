//! Equivalent-circuit primitives for impedance synthesis.

/// Lumped element definitions.
pub mod element;
/// Closed-form circuit models and sweep-level evaluation.
pub mod model;

pub use element::{parallel, Capacitor, Cpe, Resistor, Warburg};
pub use model::{impedance_rc_cpe, impedance_warburg, CircuitModel};
