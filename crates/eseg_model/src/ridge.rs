//! Kernel ridge regression
//!
//! Fits dual weights `w = (K + lambda * I)^-1 * y` over the training rows and
//! predicts `f(x) = sum_i w_i * k(x, x_i)`. `lambda` is the ridge
//! regularization strength; `w` are the dual weights.

use nalgebra::DVector;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{EsegError, Result};
use crate::features::FeatureRow;
use crate::kernel::PolynomialKernel;

/// Unfitted estimator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelRidge {
    pub regularization: f64,
    pub kernel: PolynomialKernel,
}

impl KernelRidge {
    pub fn new(regularization: f64, kernel: PolynomialKernel) -> Self {
        Self {
            regularization,
            kernel,
        }
    }

    /// Solve the regularized dual system on (already standardized) rows
    pub fn fit(&self, x: &[FeatureRow], y: &[f64]) -> Result<FittedKernelRidge> {
        if x.is_empty() {
            return Err(EsegError::TooFewRows { needed: 1, got: 0 });
        }
        if x.len() != y.len() {
            return Err(EsegError::RaggedColumn {
                column: "target".to_string(),
                expected: x.len(),
                got: y.len(),
            });
        }

        let n = x.len();
        let mut system = self.kernel.gram(x);
        for i in 0..n {
            system[(i, i)] += self.regularization;
        }
        let rhs = DVector::from_column_slice(y);

        let dual_weights = match system.clone().cholesky() {
            Some(cholesky) => {
                debug!("Solved {}x{} kernel system by Cholesky", n, n);
                cholesky.solve(&rhs)
            }
            None => {
                warn!(
                    "Kernel system of size {} is not positive definite, falling back to LU",
                    n
                );
                system.lu().solve(&rhs).ok_or_else(|| {
                    EsegError::Numerical(format!("singular {n}x{n} kernel system"))
                })?
            }
        };

        if dual_weights.iter().any(|w| !w.is_finite()) {
            return Err(EsegError::Numerical(
                "kernel ridge solve produced non-finite dual weights".to_string(),
            ));
        }

        Ok(FittedKernelRidge {
            kernel: self.kernel,
            train: x.to_vec(),
            dual_weights: dual_weights.as_slice().to_vec(),
        })
    }
}

/// Dual weights over the standardized training rows
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FittedKernelRidge {
    kernel: PolynomialKernel,
    train: Vec<FeatureRow>,
    dual_weights: Vec<f64>,
}

impl FittedKernelRidge {
    pub fn dual_weights(&self) -> &[f64] {
        &self.dual_weights
    }

    pub fn kernel(&self) -> &PolynomialKernel {
        &self.kernel
    }

    /// Predict standardized query rows
    pub fn predict(&self, queries: &[FeatureRow]) -> Vec<f64> {
        let k = self.kernel.cross(queries, &self.train);
        let w = DVector::from_column_slice(&self.dual_weights);
        (k * w).as_slice().to_vec()
    }
}
