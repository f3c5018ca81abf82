//! Eseg parity plot CLI
//!
//! Fits the Eseg model, reports its LOOCV-MAE and writes the parity plot.

use anyhow::{Context, Result};
use clap::Parser;
use eseg_model::pipeline::{
    KERNEL_COEF0, KERNEL_GAMMA, MODEL_DESCRIPTION, POLY_DEGREE, RIDGE_REGULARIZATION,
};
use eseg_model::{run_parity, EsegConfig, LoocvReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "eseg-parity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reproduce the Eseg model parity plot and LOOCV-MAE", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset CSV (defaults to the bundled data/dataset.csv)
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Output SVG for the parity plot
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the LOOCV report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Hyperparameters {
    degree: i32,
    regularization: f64,
    gamma: f64,
    coef0: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    model: &'a str,
    version: &'a str,
    rows: usize,
    hyperparameters: Hyperparameters,
    loocv: &'a LoocvReport,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Eseg model v{}", eseg_model::VERSION);

    let mut config = match &args.config {
        Some(path) => EsegConfig::from_toml_file(path).context("Failed to load configuration")?,
        None => EsegConfig::default(),
    };
    if let Some(dataset) = args.dataset {
        config.dataset_path = dataset;
    }
    if let Some(output) = args.output {
        config.output = output;
    }

    let table = config
        .loader()
        .load()
        .with_context(|| format!("Failed to load dataset {}", config.dataset_path.display()))?;

    let run = run_parity(&table).context("Failed to reproduce parity plot")?;

    info!("Model: {}", MODEL_DESCRIPTION);
    info!("  Rows: {}", run.predictions.len());
    info!("  LOOCV-MAE: {:.3} eV", run.loocv.mean_absolute_error);
    info!("  Worst held-out error: {:.3} eV", run.loocv.max_absolute_error());

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    run.figure
        .clone()
        .with_size(config.width, config.height)
        .save_svg(&config.output)
        .context("Failed to render parity plot")?;

    if let Some(report_path) = args.report {
        let report = Report {
            model: MODEL_DESCRIPTION,
            version: eseg_model::VERSION,
            rows: run.predictions.len(),
            hyperparameters: Hyperparameters {
                degree: POLY_DEGREE,
                regularization: RIDGE_REGULARIZATION,
                gamma: KERNEL_GAMMA,
                coef0: KERNEL_COEF0,
            },
            loocv: &run.loocv,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(&report_path, json).context("Failed to write report file")?;
        info!("Report saved to: {}", report_path.display());
    }

    info!("Parity plot: {}", config.output.display());
    Ok(())
}
