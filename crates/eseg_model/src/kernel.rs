//! Polynomial kernel
//!
//! `k(u, v) = (gamma * <u, v> + coef0) ^ degree`

use nalgebra::DMatrix;
use serde::Serialize;

use crate::features::FeatureRow;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PolynomialKernel {
    pub gamma: f64,
    pub coef0: f64,
    pub degree: i32,
}

impl PolynomialKernel {
    pub fn new(gamma: f64, coef0: f64, degree: i32) -> Self {
        Self {
            gamma,
            coef0,
            degree,
        }
    }

    #[inline]
    pub fn eval(&self, u: &FeatureRow, v: &FeatureRow) -> f64 {
        let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
        (self.gamma * dot + self.coef0).powi(self.degree)
    }

    /// Square Gram matrix `K[i][j] = k(x_i, x_j)`
    pub fn gram(&self, x: &[FeatureRow]) -> DMatrix<f64> {
        let n = x.len();
        let mut k = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let value = self.eval(&x[i], &x[j]);
                k[(i, j)] = value;
                k[(j, i)] = value;
            }
        }
        k
    }

    /// Rectangular kernel between query rows and training rows
    pub fn cross(&self, queries: &[FeatureRow], train: &[FeatureRow]) -> DMatrix<f64> {
        DMatrix::from_fn(queries.len(), train.len(), |i, j| {
            self.eval(&queries[i], &train[j])
        })
    }
}
