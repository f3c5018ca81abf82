//! Run configuration
//!
//! Only I/O locations and figure size are configurable. Model
//! hyperparameters are constants in [`crate::pipeline`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::dataset::{bundled_dataset_path, DatasetLoader};
use crate::errors::{EsegError, Result};

/// Where to read the dataset and write the parity plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsegConfig {
    /// Dataset CSV
    pub dataset_path: PathBuf,
    /// Parity plot SVG
    pub output: PathBuf,
    /// Figure width (px)
    pub width: u32,
    /// Figure height (px)
    pub height: u32,
}

impl Default for EsegConfig {
    fn default() -> Self {
        Self {
            dataset_path: bundled_dataset_path(),
            output: PathBuf::from("eseg_parity.svg"),
            width: 640,
            height: 480,
        }
    }
}

impl EsegConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .map_err(|e| EsegError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        let config: EsegConfig = toml::from_str(&content)
            .map_err(|e| EsegError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EsegError::Config(format!(
                "figure size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn loader(&self) -> DatasetLoader {
        DatasetLoader::new(&self.dataset_path)
    }
}
