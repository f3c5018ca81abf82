//! Eseg model - segregation energy of dopants in host metal surfaces
//!
//! Fits a standardization + 2nd order polynomial kernel ridge pipeline to
//! five atomic descriptors, scores it with leave-one-out cross-validation,
//! and draws the parity plot of predicted against DFT segregation energies.
//!
//! ```no_run
//! use eseg_model::{get_eseg_model, Predictor};
//!
//! let model = get_eseg_model()?;
//! // Pd doped into a Rh FCC(110) surface
//! let eseg = model.predict_one(&[-0.28, 0.0244, 0.575, 1.69, 8.33686])?;
//! println!("{eseg:.3} eV");
//! # Ok::<(), eseg_model::EsegError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod features;
pub mod kernel;
pub mod pipeline;
pub mod plot;
pub mod ridge;
pub mod scaler;

use tracing::info;

pub use config::EsegConfig;
pub use dataset::{Column, ColumnData, DatasetLoader, Table};
pub use errors::{EsegError, Result};
pub use evaluation::{leave_one_out, mean_absolute_error, LoocvReport};
pub use features::{
    get_training_data, FeatureRow, TrainingData, FEATURE_COLUMNS, HOST_COLUMN, N_FEATURES,
    TARGET_COLUMN,
};
pub use pipeline::{get_eseg_model, EsegModel, EsegPipeline, Estimator, Predictor};
pub use plot::{HostGroup, ParityFigure};

/// Complete Eseg dataset from the bundled CSV
pub fn load_dataset() -> Result<Table> {
    DatasetLoader::bundled().load()
}

/// Everything produced while reproducing the parity plot
#[derive(Clone, Debug)]
pub struct ParityRun {
    /// Model fitted on every row
    pub model: EsegModel,
    /// In-sample predictions of `model`, in row order
    pub predictions: Vec<f64>,
    pub loocv: LoocvReport,
    pub figure: ParityFigure,
}

/// Fit, cross-validate and lay out the parity plot for `table`
pub fn run_parity(table: &Table) -> Result<ParityRun> {
    let data = TrainingData::from_table(table)?;
    let pipeline = EsegPipeline::new();

    let model = pipeline.fit(&data)?;
    let loocv = leave_one_out(&pipeline, &data)?;
    let predictions = model.predict_rows(&data.features);
    let figure = ParityFigure::build(table, &predictions, loocv.mean_absolute_error)?;

    info!(
        "{}: LOOCV-MAE = {:.3} eV over {} rows",
        pipeline::MODEL_DESCRIPTION,
        loocv.mean_absolute_error,
        data.len()
    );

    Ok(ParityRun {
        model,
        predictions,
        loocv,
        figure,
    })
}

/// Parity plot of the bundled dataset, with its LOOCV report
pub fn reproduce_parity_plot() -> Result<(ParityFigure, LoocvReport)> {
    let run = run_parity(&load_dataset()?)?;
    Ok((run.figure, run.loocv))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
