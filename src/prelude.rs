//! Convenience re-exports for building impedance experiments.

pub use crate::analysis::{
    compare_to_baseline, estimate_all, estimate_parameters, save_estimates_csv, save_report,
    write_estimates_csv, write_report, BaselineComparison, ParameterDelta, ParameterEstimate,
    ScenarioEstimate, HIGH_FREQUENCY_CUTOFF_HZ, LOW_FREQUENCY_CUTOFF_HZ,
};
pub use crate::circuits::{
    element::{parallel, Capacitor, Cpe, Resistor, Warburg},
    model::{impedance_rc_cpe, impedance_warburg, CircuitModel},
};
pub use crate::dataset::{
    generate_curve, generate_dataset, save_dataset_csv, write_dataset_csv, EisDataset,
    ImpedanceCurve, SpectrumPoint,
};
pub use crate::errors::EisError;
pub use crate::math::{angular_frequency, jomega_pow, phasor, CScalar, Scalar};
pub use crate::plot::{
    plot_baseline_comparisons, plot_bode, plot_nyquist, render_baseline_comparison_svg,
    render_bode_svg, render_nyquist_svg, PlotStyle,
};
pub use crate::scenario::{Scenario, ScenarioCatalog, BASELINE_SCENARIO};
pub use crate::sweep::{
    FrequencySweep, REFERENCE_POINTS, REFERENCE_START_HZ, REFERENCE_STOP_HZ,
};
