//! Leave-one-out cross-validation
//!
//! Each fold refits the full recipe (scaler included) on every row but one
//! and scores the held-out row.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{EsegError, Result};
use crate::features::TrainingData;
use crate::pipeline::{Estimator, Predictor};

/// Per-row LOOCV outcome, in dataset order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoocvReport {
    /// Prediction for each row from the fold that held it out
    pub held_out_predictions: Vec<f64>,
    /// `|y_i - y_hat_i|` for each row
    pub absolute_errors: Vec<f64>,
    /// Mean of `absolute_errors`
    pub mean_absolute_error: f64,
}

impl LoocvReport {
    pub fn folds(&self) -> usize {
        self.absolute_errors.len()
    }

    pub fn max_absolute_error(&self) -> f64 {
        self.absolute_errors.iter().copied().fold(0.0, f64::max)
    }
}

/// Arithmetic mean of `|actual - predicted|`
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(EsegError::RaggedColumn {
            column: "predicted".to_string(),
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(EsegError::TooFewRows { needed: 1, got: 0 });
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, y_hat)| (y - y_hat).abs())
        .sum();
    Ok(total / actual.len() as f64)
}

/// Run LOOCV of `estimator` over `data`
pub fn leave_one_out<E: Estimator>(estimator: &E, data: &TrainingData) -> Result<LoocvReport> {
    let n = data.len();
    if n < 2 {
        return Err(EsegError::TooFewRows { needed: 2, got: n });
    }

    let mut held_out_predictions = Vec::with_capacity(n);
    let mut absolute_errors = Vec::with_capacity(n);

    for i in 0..n {
        let model = estimator.fit(&data.without_row(i))?;
        let y_hat = model.predict_one(&data.features[i])?;
        let error = (data.targets[i] - y_hat).abs();
        debug!(
            "Fold {}/{}: actual={:.4} predicted={:.4} error={:.4}",
            i + 1,
            n,
            data.targets[i],
            y_hat,
            error
        );
        held_out_predictions.push(y_hat);
        absolute_errors.push(error);
    }

    let mae = mean_absolute_error(&data.targets, &held_out_predictions)?;
    info!("LOOCV over {} folds: MAE = {:.3}", n, mae);

    Ok(LoocvReport {
        held_out_predictions,
        absolute_errors,
        mean_absolute_error: mae,
    })
}
