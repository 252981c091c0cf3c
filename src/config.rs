//! Artifact locations.
//!
//! Directories come from the environment (optionally via `.env`) and can be
//! overridden on the command line.

use std::path::{Path, PathBuf};

use crate::domain::{CpiCategory, ModelKind};

pub const DATA_DIR_VAR: &str = "CPI_DATA_DIR";
pub const MODELS_DIR_VAR: &str = "CPI_MODELS_DIR";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MODELS_DIR: &str = "models";

/// Where each stage reads and writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl PipelineConfig {
    /// Load from `.env` / process environment, falling back to `data/` and `models/`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (used by `from_env` and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Self {
            data_dir: dir(DATA_DIR_VAR, DEFAULT_DATA_DIR),
            models_dir: dir(MODELS_DIR_VAR, DEFAULT_MODELS_DIR),
        }
    }

    /// Apply CLI overrides.
    pub fn with_overrides(mut self, data_dir: Option<&Path>, models_dir: Option<&Path>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir.to_path_buf();
        }
        if let Some(dir) = models_dir {
            self.models_dir = dir.to_path_buf();
        }
        self
    }

    /// The 3-line table cut out of the raw export.
    pub fn minimal_path(&self) -> PathBuf {
        self.data_dir.join("qc_food_cpi_minimal.csv")
    }

    pub fn clean_path(&self, category: CpiCategory) -> PathBuf {
        let name = match category {
            CpiCategory::Stores => "qc_food_purchased_from_stores_clean.csv",
            CpiCategory::Restaurants => "qc_food_purchased_from_restaurants_clean.csv",
        };
        self.data_dir.join(name)
    }

    pub fn forecast_path(&self, category: CpiCategory) -> PathBuf {
        let name = match category {
            CpiCategory::Stores => "qc_food_stores_forecast.csv",
            CpiCategory::Restaurants => "qc_food_restaurants_forecast.csv",
        };
        self.data_dir.join(name)
    }

    pub fn model_path(&self, category: CpiCategory, kind: ModelKind) -> PathBuf {
        self.models_dir
            .join(format!("{}_cpi_{}.json", category.tag(), kind.file_suffix()))
    }
}
