#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Shared numerical primitives for phasor arithmetic.
pub mod math;
/// Frequency sweep construction and validation.
pub mod sweep;
/// Equivalent-circuit elements and closed-form models.
pub mod circuits;
/// Degradation scenarios and the catalog that orders them.
pub mod scenario;
/// Labeled impedance curves, dataset generation, and CSV export.
pub mod dataset;
/// Asymptote-based parameter estimation and degradation reporting.
pub mod analysis;
/// SVG rendering of Nyquist and Bode views.
pub mod plot;
/// Error types shared between submodules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
