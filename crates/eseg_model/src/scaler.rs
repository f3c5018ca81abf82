//! Feature standardization
//!
//! The standard score of a value is `z = (x - mean) / scale`, where `scale`
//! is the population standard deviation (divide by n) of the training
//! column. Columns that are constant up to rounding keep `scale = 1`.

use serde::Serialize;

use crate::errors::{EsegError, Result};
use crate::features::{FeatureRow, N_FEATURES};

/// Learns per-column statistics from a training matrix
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }

    /// Compute mean and scale of each column
    pub fn fit(&self, x: &[FeatureRow]) -> Result<FittedScaler> {
        let n_samples = x.len();
        if n_samples == 0 {
            return Err(EsegError::TooFewRows { needed: 1, got: 0 });
        }
        let n = n_samples as f64;

        let mut mean = [0.0; N_FEATURES];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            *mean_j = x.iter().map(|row| row[j]).sum::<f64>() / n;
        }

        let mut scale = [1.0; N_FEATURES];
        for (j, scale_j) in scale.iter_mut().enumerate() {
            let var = x
                .iter()
                .map(|row| {
                    let diff = row[j] - mean[j];
                    diff * diff
                })
                .sum::<f64>()
                / n;

            if !is_constant_feature(var, mean[j], n) {
                *scale_j = var.sqrt();
            }
        }

        Ok(FittedScaler { mean, scale })
    }
}

/// Variance below what summation rounding alone could produce
fn is_constant_feature(var: f64, mean: f64, n_samples: f64) -> bool {
    let eps = f64::EPSILON;
    let upper_bound = n_samples * eps * var + (n_samples * mean * eps).powi(2);
    var <= upper_bound
}

/// Per-column statistics learned by [`StandardScaler::fit`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FittedScaler {
    mean: FeatureRow,
    scale: FeatureRow,
}

impl FittedScaler {
    pub fn mean(&self) -> &FeatureRow {
        &self.mean
    }

    pub fn scale(&self) -> &FeatureRow {
        &self.scale
    }

    #[inline]
    pub fn transform_row(&self, row: &FeatureRow) -> FeatureRow {
        let mut z = [0.0; N_FEATURES];
        for j in 0..N_FEATURES {
            z[j] = (row[j] - self.mean[j]) / self.scale[j];
        }
        z
    }

    pub fn transform(&self, x: &[FeatureRow]) -> Vec<FeatureRow> {
        x.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn inverse_transform(&self, z: &[FeatureRow]) -> Vec<FeatureRow> {
        z.iter()
            .map(|row| {
                let mut x = [0.0; N_FEATURES];
                for j in 0..N_FEATURES {
                    x[j] = row[j] * self.scale[j] + self.mean[j];
                }
                x
            })
            .collect()
    }
}
