//! SVG rendering of Nyquist and Bode views.
//!
//! Charts render into in-memory SVG strings first; the `plot_*` helpers
//! persist them under the conventional results tree. Nyquist axes are
//! expanded to a common span so the semicircles keep their aspect ratio.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::dataset::EisDataset;
use crate::errors::{EisError, Result};
use crate::math::Scalar;
use crate::scenario::BASELINE_SCENARIO;

/// Figure geometry and series colors shared by all charts.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Canvas fill color.
    pub background: RGBColor,
    /// Per-curve colors, applied in dataset order and reused cyclically.
    pub palette: Vec<RGBColor>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            background: WHITE,
            palette: vec![BLUE, RED, GREEN, MAGENTA, CYAN, BLACK],
        }
    }
}

impl PlotStyle {
    /// Color for the curve at `index`, cycling through the palette.
    #[must_use]
    pub fn color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            BLACK
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}

/// Spaced legend label from a snake_case scenario name, e.g.
/// `increased_ohmic` becomes `Increased Ohmic`.
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn padded(min: Scalar, max: Scalar) -> (Scalar, Scalar) {
    let span = (max - min).max(1.0e-9);
    (min - 0.05 * span, max + 0.05 * span)
}

/// Pads both ranges, then widens the narrower one so a semicircle in the
/// data stays a semicircle on screen.
fn equalized_ranges(
    x: (Scalar, Scalar),
    y: (Scalar, Scalar),
) -> ((Scalar, Scalar), (Scalar, Scalar)) {
    let (x0, x1) = padded(x.0, x.1);
    let (y0, y1) = padded(y.0, y.1);
    let span = (x1 - x0).max(y1 - y0);
    let xc = (x0 + x1) / 2.0;
    let yc = (y0 + y1) / 2.0;
    (
        (xc - span / 2.0, xc + span / 2.0),
        (yc - span / 2.0, yc + span / 2.0),
    )
}

fn bounds<I>(values: I) -> (Scalar, Scalar)
where
    I: Iterator<Item = Scalar>,
{
    values.fold((Scalar::INFINITY, Scalar::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn require_samples(dataset: &EisDataset) -> Result<()> {
    if dataset.point_count() == 0 {
        return Err(EisError::Plot("dataset has no samples".into()));
    }
    Ok(())
}

/// One named, colored Nyquist trace.
struct NyquistSeries {
    label: String,
    color: RGBColor,
    points: Vec<(Scalar, Scalar)>,
}

fn render_nyquist_frame(
    title: &str,
    series: &[NyquistSeries],
    style: &PlotStyle,
) -> Result<String> {
    let x = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.0)));
    let y = bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)));
    let ((x0, x1), (y0, y1)) = equalized_ranges(x, y);

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(title, ("sans-serif", 24))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc("Z' (Real Impedance) / Ω")
            .y_desc("-Z'' (Imaginary Impedance) / Ω")
            .light_line_style(&BLACK.mix(0.1))
            .draw()?;
        for s in series {
            let color = s.color;
            chart
                .draw_series(LineSeries::new(s.points.iter().copied(), &color))?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart
            .configure_series_labels()
            .border_style(&BLACK.mix(0.4))
            .background_style(&WHITE.mix(0.8))
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}

/// Renders the combined Nyquist chart, one trace per scenario, as SVG text.
///
/// # Errors
///
/// Returns [`EisError::Plot`] when the dataset has no samples or the chart
/// backend fails.
pub fn render_nyquist_svg(dataset: &EisDataset, style: &PlotStyle) -> Result<String> {
    require_samples(dataset)?;
    let series: Vec<NyquistSeries> = dataset
        .curves()
        .iter()
        .enumerate()
        .map(|(idx, curve)| NyquistSeries {
            label: title_case(curve.scenario()),
            color: style.color(idx),
            points: curve
                .iter()
                .map(|p| (p.impedance.re, -p.impedance.im))
                .collect(),
        })
        .collect();
    render_nyquist_frame("EIS Analysis: Nyquist Plot Comparison", &series, style)
}

/// Renders a two-panel Bode chart (|Z| and phase over log frequency) as
/// SVG text.
///
/// # Errors
///
/// Returns [`EisError::Plot`] when the dataset has no samples or the chart
/// backend fails.
pub fn render_bode_svg(dataset: &EisDataset, style: &PlotStyle) -> Result<String> {
    require_samples(dataset)?;
    let all_points = || dataset.curves().iter().flat_map(|c| c.iter());
    let (f_lo, f_hi) = bounds(all_points().map(|p| p.frequency));
    let (m_lo, m_hi) = {
        let b = bounds(all_points().map(|p| p.magnitude()));
        padded(b.0, b.1)
    };
    let (p_lo, p_hi) = {
        let b = bounds(all_points().map(|p| p.phase_deg()));
        padded(b.0, b.1)
    };

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&style.background)?;
        let (upper, lower) = root.split_vertically(style.height as i32 / 2);

        let mut magnitude = ChartBuilder::on(&upper)
            .margin(10)
            .caption("Bode Plot - Magnitude", ("sans-serif", 24))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 35)
            .build_cartesian_2d((f_lo..f_hi).log_scale(), m_lo..m_hi)?;
        magnitude
            .configure_mesh()
            .y_desc("|Z| (Ω)")
            .light_line_style(&BLACK.mix(0.1))
            .draw()?;
        for (idx, curve) in dataset.curves().iter().enumerate() {
            let color = style.color(idx);
            magnitude
                .draw_series(LineSeries::new(
                    curve.iter().map(|p| (p.frequency, p.magnitude())),
                    &color,
                ))?
                .label(title_case(curve.scenario()))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        magnitude
            .configure_series_labels()
            .border_style(&BLACK.mix(0.4))
            .background_style(&WHITE.mix(0.8))
            .draw()?;

        let mut phase = ChartBuilder::on(&lower)
            .margin(10)
            .caption("Bode Plot - Phase", ("sans-serif", 24))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d((f_lo..f_hi).log_scale(), p_lo..p_hi)?;
        phase
            .configure_mesh()
            .x_desc("Frequency (Hz)")
            .y_desc("Phase (degrees)")
            .light_line_style(&BLACK.mix(0.1))
            .draw()?;
        for (idx, curve) in dataset.curves().iter().enumerate() {
            let color = style.color(idx);
            phase.draw_series(LineSeries::new(
                curve.iter().map(|p| (p.frequency, p.phase_deg())),
                &color,
            ))?;
        }
        root.present()?;
    }
    Ok(svg)
}

/// Renders a single degradation scenario against the baseline on a Nyquist
/// frame, as SVG text.
///
/// # Errors
///
/// Returns [`EisError::MissingBaseline`] when the dataset lacks a baseline
/// curve, [`EisError::UnknownScenario`] when `scenario` is not in the
/// dataset, and [`EisError::Plot`] for backend failures.
pub fn render_baseline_comparison_svg(
    dataset: &EisDataset,
    scenario: &str,
    style: &PlotStyle,
) -> Result<String> {
    require_samples(dataset)?;
    let baseline = dataset
        .curve(BASELINE_SCENARIO)
        .ok_or(EisError::MissingBaseline)?;
    let (index, curve) = dataset
        .curves()
        .iter()
        .enumerate()
        .find(|(_, c)| c.scenario() == scenario)
        .ok_or_else(|| EisError::UnknownScenario(scenario.to_owned()))?;

    let series = [
        NyquistSeries {
            label: "Baseline (Healthy Cell)".to_owned(),
            color: style.color(0),
            points: baseline
                .iter()
                .map(|p| (p.impedance.re, -p.impedance.im))
                .collect(),
        },
        NyquistSeries {
            label: title_case(scenario),
            color: style.color(index),
            points: curve
                .iter()
                .map(|p| (p.impedance.re, -p.impedance.im))
                .collect(),
        },
    ];
    let title = format!("Nyquist Plot: Baseline vs {}", title_case(scenario));
    render_nyquist_frame(&title, &series, style)
}

fn save_svg(path: &Path, svg: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    file.write_all(svg.as_bytes())?;
    Ok(())
}

/// Renders and saves the combined Nyquist chart.
///
/// # Errors
///
/// Same as [`render_nyquist_svg`], plus [`EisError::Io`] on write failure.
pub fn plot_nyquist(path: impl AsRef<Path>, dataset: &EisDataset, style: &PlotStyle) -> Result<()> {
    let path = path.as_ref();
    save_svg(path, &render_nyquist_svg(dataset, style)?)?;
    tracing::info!(path = %path.display(), "wrote Nyquist plot");
    Ok(())
}

/// Renders and saves the two-panel Bode chart.
///
/// # Errors
///
/// Same as [`render_bode_svg`], plus [`EisError::Io`] on write failure.
pub fn plot_bode(path: impl AsRef<Path>, dataset: &EisDataset, style: &PlotStyle) -> Result<()> {
    let path = path.as_ref();
    save_svg(path, &render_bode_svg(dataset, style)?)?;
    tracing::info!(path = %path.display(), "wrote Bode plot");
    Ok(())
}

/// Renders and saves one `baseline_vs_<scenario>.svg` per degradation
/// curve in the dataset, returning the written paths in dataset order.
///
/// # Errors
///
/// Same as [`render_baseline_comparison_svg`], plus [`EisError::Io`] on
/// write failure.
pub fn plot_baseline_comparisons(
    dir: impl AsRef<Path>,
    dataset: &EisDataset,
    style: &PlotStyle,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    for curve in dataset.curves() {
        if curve.scenario() == BASELINE_SCENARIO {
            continue;
        }
        let svg = render_baseline_comparison_svg(dataset, curve.scenario(), style)?;
        let path = dir.join(format!("baseline_vs_{}.svg", curve.scenario()));
        save_svg(&path, &svg)?;
        tracing::info!(path = %path.display(), "wrote comparison plot");
        written.push(path);
    }
    Ok(written)
}
