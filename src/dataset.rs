//! Labeled impedance curves and the flat CSV dataset they export to.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::errors::Result;
use crate::math::{CScalar, Scalar};
use crate::scenario::{Scenario, ScenarioCatalog};
use crate::sweep::FrequencySweep;

/// Impedance of one scenario at a single excitation frequency.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumPoint {
    /// Excitation frequency in hertz.
    pub frequency: Scalar,
    /// Complex impedance in ohms.
    pub impedance: CScalar,
}

impl SpectrumPoint {
    /// Impedance magnitude |Z| in ohms.
    #[must_use]
    pub fn magnitude(&self) -> Scalar {
        self.impedance.norm()
    }

    /// Phase angle of Z in degrees, negative for capacitive behavior.
    #[must_use]
    pub fn phase_deg(&self) -> Scalar {
        self.impedance.arg().to_degrees()
    }
}

/// One scenario's spectrum: its label plus the points in sweep order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImpedanceCurve {
    scenario: String,
    points: Vec<SpectrumPoint>,
}

impl ImpedanceCurve {
    /// Wraps already-evaluated points under a scenario label.
    #[must_use]
    pub fn new(scenario: impl Into<String>, points: Vec<SpectrumPoint>) -> Self {
        Self {
            scenario: scenario.into(),
            points,
        }
    }

    /// Scenario label this curve was generated for.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Points in sweep order.
    #[must_use]
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    /// Number of sampled frequencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the curve holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the points in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = &SpectrumPoint> {
        self.points.iter()
    }
}

/// A full synthesis run: one curve per scenario, baseline first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EisDataset {
    curves: Vec<ImpedanceCurve>,
}

impl EisDataset {
    /// Wraps pre-built curves, keeping their order.
    #[must_use]
    pub const fn new(curves: Vec<ImpedanceCurve>) -> Self {
        Self { curves }
    }

    /// Curves in generation order.
    #[must_use]
    pub fn curves(&self) -> &[ImpedanceCurve] {
        &self.curves
    }

    /// Looks up a curve by scenario label.
    #[must_use]
    pub fn curve(&self, scenario: &str) -> Option<&ImpedanceCurve> {
        self.curves.iter().find(|c| c.scenario() == scenario)
    }

    /// Number of curves.
    #[must_use]
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Total number of points across all curves; one CSV row each.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.curves.iter().map(ImpedanceCurve::len).sum()
    }
}

/// Evaluates one scenario's model across the sweep.
#[must_use]
pub fn generate_curve(sweep: &FrequencySweep, scenario: &Scenario) -> ImpedanceCurve {
    let impedances = scenario.model().sweep_impedance(sweep);
    let points = sweep
        .iter()
        .zip(impedances)
        .map(|(frequency, impedance)| SpectrumPoint {
            frequency,
            impedance,
        })
        .collect();
    ImpedanceCurve::new(scenario.name(), points)
}

/// Evaluates every catalog scenario across the sweep, baseline first.
#[must_use]
pub fn generate_dataset(sweep: &FrequencySweep, catalog: &ScenarioCatalog) -> EisDataset {
    let _span = tracing::info_span!(
        "generate_dataset",
        scenarios = catalog.scenario_count(),
        points = sweep.len()
    )
    .entered();
    let curves = catalog
        .iter()
        .map(|scenario| {
            let curve = generate_curve(sweep, scenario);
            tracing::debug!(scenario = scenario.name(), points = curve.len(), "generated curve");
            curve
        })
        .collect();
    EisDataset::new(curves)
}

/// Writes the dataset as flat CSV with the fixed header
/// `frequency,Z_real,Z_imag,scenario,|Z|,phase_angle`, one row per point,
/// curves in dataset order.
pub fn write_dataset_csv<W: Write>(mut w: W, dataset: &EisDataset) -> io::Result<()> {
    writeln!(w, "frequency,Z_real,Z_imag,scenario,|Z|,phase_angle")?;
    for curve in dataset.curves() {
        for p in curve.iter() {
            writeln!(
                w,
                "{:.16e},{:.16e},{:.16e},{},{:.16e},{:.16e}",
                p.frequency,
                p.impedance.re,
                p.impedance.im,
                curve.scenario(),
                p.magnitude(),
                p.phase_deg()
            )?;
        }
    }
    Ok(())
}

/// Saves the dataset CSV to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::errors::EisError::Io`] when the directory or file
/// cannot be written.
pub fn save_dataset_csv(path: impl AsRef<Path>, dataset: &EisDataset) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_dataset_csv(&mut out, dataset)?;
    out.flush()?;
    tracing::info!(path = %path.display(), rows = dataset.point_count(), "wrote dataset CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::angular_frequency;

    #[test]
    fn point_derives_magnitude_and_phase() {
        let p = SpectrumPoint {
            frequency: 10.0,
            impedance: CScalar::new(3.0, -4.0),
        };
        assert_relative_eq!(p.magnitude(), 5.0, epsilon = 1.0e-12);
        assert_relative_eq!(p.phase_deg(), (-4.0f64 / 3.0).atan().to_degrees(), epsilon = 1.0e-12);
    }

    #[test]
    fn curve_covers_the_whole_sweep_in_order() {
        let sweep = FrequencySweep::log_spaced(0.1, 1.0e4, 40).unwrap();
        let scenario = ScenarioCatalog::reference().baseline().clone();
        let curve = generate_curve(&sweep, &scenario);
        assert_eq!(curve.len(), 40);
        for (f, p) in sweep.iter().zip(curve.iter()) {
            assert_relative_eq!(p.frequency, f, max_relative = 1.0e-15);
        }
    }

    #[test]
    fn dataset_is_catalog_ordered_with_baseline_first() {
        let sweep = FrequencySweep::log_spaced(1.0, 100.0, 5).unwrap();
        let dataset = generate_dataset(&sweep, &ScenarioCatalog::reference());
        let labels: Vec<&str> = dataset.curves().iter().map(ImpedanceCurve::scenario).collect();
        assert_eq!(
            labels,
            ["baseline", "increased_ohmic", "increased_ct", "mass_transfer"]
        );
        assert_eq!(dataset.point_count(), 20);
        assert!(dataset.curve("mass_transfer").is_some());
        assert!(dataset.curve("nonexistent").is_none());
    }

    #[test]
    fn mass_transfer_curve_uses_the_warburg_branch() {
        let sweep = FrequencySweep::from_frequencies(vec![0.1]).unwrap();
        let catalog = ScenarioCatalog::reference();
        let curve = generate_curve(&sweep, catalog.get("mass_transfer").unwrap());
        let z = curve.points()[0].impedance;
        assert_relative_eq!(z.re, 6.907_831_255_702, max_relative = 1.0e-9);
        assert_relative_eq!(z.im, -6.307_988_384_668, max_relative = 1.0e-9);
    }

    #[test]
    fn generated_points_match_the_scenario_model() {
        let sweep = FrequencySweep::log_spaced(0.5, 5.0e3, 11).unwrap();
        let catalog = ScenarioCatalog::reference();
        for scenario in catalog.iter() {
            let curve = generate_curve(&sweep, scenario);
            for p in curve.iter() {
                let expected = scenario.model().impedance(angular_frequency(p.frequency));
                assert_relative_eq!(p.impedance.re, expected.re, max_relative = 1.0e-12);
                assert_relative_eq!(p.impedance.im, expected.im, max_relative = 1.0e-12);
            }
        }
    }

    #[test]
    fn csv_has_fixed_header_and_one_row_per_point() {
        let sweep = FrequencySweep::log_spaced(1.0, 10.0, 3).unwrap();
        let dataset = generate_dataset(&sweep, &ScenarioCatalog::reference());
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &dataset).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "frequency,Z_real,Z_imag,scenario,|Z|,phase_angle");
        assert_eq!(lines.len(), 1 + dataset.point_count());
        assert!(lines[1].contains(",baseline,"));
        assert!(lines.last().unwrap().contains(",mass_transfer,"));
        for row in &lines[1..] {
            assert_eq!(row.split(',').count(), 6);
        }
    }
}
