//! Feature and target extraction
//!
//! Features, in the column order the model is fitted to:
//! 0. `diff_CEb/cn`: (CE_host - CE_dopant) / CN_dopant
//! 1. `gordy_eneg_host`: Gordy electronegativity of the host
//! 2. `diff_EA`: EA_host - EA_dopant
//! 3. `r_dopant`: atomic radius of the dopant
//! 4. `IP_dopant`: ionization potential of the dopant

use crate::dataset::{DatasetLoader, Table};
use crate::errors::{EsegError, Result};

/// Number of descriptors per observation
pub const N_FEATURES: usize = 5;

/// Descriptor columns, in model order
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [
    "diff_CEb/cn",
    "gordy_eneg_host",
    "diff_EA",
    "r_dopant",
    "IP_dopant",
];

/// Measured segregation energy (eV)
pub const TARGET_COLUMN: &str = "Eseg";

/// Host metal, used for plot grouping only
pub const HOST_COLUMN: &str = "Host";

/// Every column the loader insists on
pub const REQUIRED_COLUMNS: [&str; N_FEATURES + 2] = [
    FEATURE_COLUMNS[0],
    FEATURE_COLUMNS[1],
    FEATURE_COLUMNS[2],
    FEATURE_COLUMNS[3],
    FEATURE_COLUMNS[4],
    TARGET_COLUMN,
    HOST_COLUMN,
];

/// One descriptor vector
pub type FeatureRow = [f64; N_FEATURES];

/// Feature matrix and aligned target vector
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingData {
    pub features: Vec<FeatureRow>,
    pub targets: Vec<f64>,
}

impl TrainingData {
    pub fn new(features: Vec<FeatureRow>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(EsegError::RaggedColumn {
                column: TARGET_COLUMN.to_string(),
                expected: features.len(),
                got: targets.len(),
            });
        }
        Ok(Self { features, targets })
    }

    /// Project the descriptor and target columns out of a table
    pub fn from_table(table: &Table) -> Result<Self> {
        let columns = FEATURE_COLUMNS
            .iter()
            .map(|name| checked_numeric(table, name))
            .collect::<Result<Vec<_>>>()?;
        let targets = checked_numeric(table, TARGET_COLUMN)?.to_vec();

        let features = (0..table.len())
            .map(|row| {
                let mut x = [0.0; N_FEATURES];
                for (j, column) in columns.iter().enumerate() {
                    x[j] = column[row];
                }
                x
            })
            .collect();

        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Every row except `held_out`
    pub fn without_row(&self, held_out: usize) -> Self {
        let (features, targets) = self
            .features
            .iter()
            .zip(&self.targets)
            .enumerate()
            .filter(|(i, _)| *i != held_out)
            .map(|(_, (x, y))| (*x, *y))
            .unzip();
        Self { features, targets }
    }

    /// Smallest and largest target
    pub fn target_range(&self) -> Option<(f64, f64)> {
        if self.targets.is_empty() {
            return None;
        }
        Some(
            self.targets
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
                    (lo.min(y), hi.max(y))
                }),
        )
    }
}

fn checked_numeric<'a>(table: &'a Table, name: &str) -> Result<&'a [f64]> {
    let values = table.numeric(name)?;
    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
        let column = name.to_string();
        return Err(if values[row].is_nan() {
            EsegError::MissingValue { column, row }
        } else {
            EsegError::NonFiniteValue { column, row }
        });
    }
    Ok(values)
}

/// Features and targets from `table`, or from the bundled dataset when `None`
pub fn get_training_data(table: Option<&Table>) -> Result<(Vec<FeatureRow>, Vec<f64>)> {
    let data = match table {
        Some(table) => TrainingData::from_table(table)?,
        None => TrainingData::from_table(&DatasetLoader::bundled().load()?)?,
    };
    Ok((data.features, data.targets))
}
