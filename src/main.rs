use clap::Parser;
use eis_lab::analysis::{estimate_all, save_estimates_csv, save_report, write_report};
use eis_lab::dataset::{generate_dataset, save_dataset_csv};
use eis_lab::plot::{plot_baseline_comparisons, plot_bode, plot_nyquist, PlotStyle};
use eis_lab::scenario::ScenarioCatalog;
use eis_lab::sweep::FrequencySweep;
use std::io;
use std::path::PathBuf;

/// Synthetic EIS degradation study: dataset, plots, and parameter report
#[derive(Parser)]
#[command(name = "eis-lab", version)]
struct Cli {
    /// Directory receiving the data/ and results/ trees
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Sweep start frequency in Hz
    #[arg(long, default_value_t = 0.1)]
    f_start: f64,

    /// Sweep stop frequency in Hz
    #[arg(long, default_value_t = 1.0e4)]
    f_stop: f64,

    /// Number of log-spaced sweep points
    #[arg(long, default_value_t = 100)]
    points: usize,

    /// Skip SVG chart rendering
    #[arg(long)]
    no_plots: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let sweep = FrequencySweep::log_spaced(cli.f_start, cli.f_stop, cli.points).unwrap_or_else(|e| {
        eprintln!("Sweep error: {}", e);
        std::process::exit(1);
    });
    let catalog = ScenarioCatalog::reference();

    let dataset = generate_dataset(&sweep, &catalog);
    save_dataset_csv(cli.out_dir.join("data/synthetic_eis_data.csv"), &dataset).unwrap_or_else(
        |e| {
            eprintln!("Data export error: {}", e);
            std::process::exit(1);
        },
    );

    if !cli.no_plots {
        let style = PlotStyle::default();
        plot_nyquist(
            cli.out_dir
                .join("results/nyquist_plots/all_scenarios_comparison.svg"),
            &dataset,
            &style,
        )
        .unwrap_or_else(|e| {
            eprintln!("Plot error: {}", e);
            std::process::exit(1);
        });
        plot_bode(
            cli.out_dir.join("results/bode_plots/bode_plot_comparison.svg"),
            &dataset,
            &style,
        )
        .unwrap_or_else(|e| {
            eprintln!("Plot error: {}", e);
            std::process::exit(1);
        });
        plot_baseline_comparisons(cli.out_dir.join("results/nyquist_plots"), &dataset, &style)
            .unwrap_or_else(|e| {
                eprintln!("Plot error: {}", e);
                std::process::exit(1);
            });
    }

    let estimates = estimate_all(&dataset).unwrap_or_else(|e| {
        eprintln!("Analysis error: {}", e);
        std::process::exit(1);
    });
    write_report(io::stdout().lock(), &estimates, &catalog).unwrap_or_else(|e| {
        eprintln!("Report error: {}", e);
        std::process::exit(1);
    });
    save_report(
        cli.out_dir
            .join("results/analysis_results/degradation_report.txt"),
        &estimates,
        &catalog,
    )
    .unwrap_or_else(|e| {
        eprintln!("Report error: {}", e);
        std::process::exit(1);
    });
    save_estimates_csv(
        cli.out_dir
            .join("results/analysis_results/circuit_parameters.csv"),
        &estimates,
    )
    .unwrap_or_else(|e| {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    });
}
