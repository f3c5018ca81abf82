//! Standardization + second-order polynomial kernel ridge pipeline
//!
//! Hyperparameters were tuned for the published dataset and are fixed here.

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::DatasetLoader;
use crate::errors::{EsegError, Result};
use crate::features::{FeatureRow, TrainingData, FEATURE_COLUMNS, N_FEATURES};
use crate::kernel::PolynomialKernel;
use crate::ridge::{FittedKernelRidge, KernelRidge};
use crate::scaler::{FittedScaler, StandardScaler};

/// Polynomial kernel degree
pub const POLY_DEGREE: i32 = 2;
/// Ridge regularization strength
pub const RIDGE_REGULARIZATION: f64 = 0.002;
/// Polynomial kernel coefficient
pub const KERNEL_GAMMA: f64 = 0.02;
/// Polynomial kernel constant offset
pub const KERNEL_COEF0: f64 = 1.0;

/// Short name used in reports and the figure legend
pub const MODEL_DESCRIPTION: &str = "2nd order poly KRR";

/// A recipe that can be fitted repeatedly, e.g. once per CV fold
pub trait Estimator {
    type Model: Predictor;

    fn fit(&self, data: &TrainingData) -> Result<Self::Model>;
}

/// A fitted model mapping feature rows to predictions
pub trait Predictor {
    fn predict<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<f64>>;

    fn predict_one(&self, row: &[f64]) -> Result<f64> {
        let predictions = self.predict(&[row])?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| EsegError::Numerical("empty prediction".to_string()))
    }
}

/// The Eseg model recipe
#[derive(Clone, Copy, Debug, Default)]
pub struct EsegPipeline;

impl EsegPipeline {
    pub fn new() -> Self {
        Self
    }

    fn regressor() -> KernelRidge {
        KernelRidge::new(
            RIDGE_REGULARIZATION,
            PolynomialKernel::new(KERNEL_GAMMA, KERNEL_COEF0, POLY_DEGREE),
        )
    }
}

impl Estimator for EsegPipeline {
    type Model = EsegModel;

    fn fit(&self, data: &TrainingData) -> Result<EsegModel> {
        if data.is_empty() {
            return Err(EsegError::TooFewRows { needed: 1, got: 0 });
        }
        debug!("Fitting Eseg pipeline on {} rows", data.len());

        let scaler = StandardScaler::new().fit(&data.features)?;
        let standardized = scaler.transform(&data.features);
        let regressor = Self::regressor().fit(&standardized, &data.targets)?;

        Ok(EsegModel { scaler, regressor })
    }
}

/// Fitted pipeline; immutable after fit
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EsegModel {
    scaler: FittedScaler,
    regressor: FittedKernelRidge,
}

impl EsegModel {
    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    pub fn regressor(&self) -> &FittedKernelRidge {
        &self.regressor
    }

    /// Predict already-validated rows
    pub fn predict_rows(&self, rows: &[FeatureRow]) -> Vec<f64> {
        self.regressor.predict(&self.scaler.transform(rows))
    }
}

impl Predictor for EsegModel {
    fn predict<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<f64>> {
        let validated = rows
            .iter()
            .enumerate()
            .map(|(row, values)| -> Result<FeatureRow> {
                let values = values.as_ref();
                let x = FeatureRow::try_from(values).map_err(|_| EsegError::Shape {
                    row,
                    expected: N_FEATURES,
                    got: values.len(),
                })?;
                match x.iter().position(|v| !v.is_finite()) {
                    Some(j) => Err(EsegError::NonFiniteValue {
                        column: FEATURE_COLUMNS[j].to_string(),
                        row,
                    }),
                    None => Ok(x),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let predictions = self.predict_rows(&validated);
        if let Some(row) = predictions.iter().position(|y| !y.is_finite()) {
            return Err(EsegError::Numerical(format!(
                "non-finite prediction for row {row}"
            )));
        }
        Ok(predictions)
    }
}

/// Eseg model fitted on the full bundled dataset
pub fn get_eseg_model() -> Result<EsegModel> {
    let table = DatasetLoader::bundled().load()?;
    let data = TrainingData::from_table(&table)?;
    let model = EsegPipeline::new().fit(&data)?;
    info!("Fitted {} on {} rows", MODEL_DESCRIPTION, data.len());
    Ok(model)
}
