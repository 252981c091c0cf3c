//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed in-memory between pipeline stages
//! - exported to CSV/JSON artifacts
//! - reloaded later by a downstream stage

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Version tag written into every persisted model artifact.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// Food CPI categories tracked by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpiCategory {
    /// Food purchased from stores (groceries).
    Stores,
    /// Food purchased from restaurants.
    Restaurants,
}

impl CpiCategory {
    pub const ALL: [CpiCategory; 2] = [CpiCategory::Stores, CpiCategory::Restaurants];

    /// Row label used in the statistical-agency export.
    pub fn label(self) -> &'static str {
        match self {
            CpiCategory::Stores => "Food purchased from stores",
            CpiCategory::Restaurants => "Food purchased from restaurants",
        }
    }

    /// Short tag used in artifact file names.
    pub fn tag(self) -> &'static str {
        match self {
            CpiCategory::Stores => "qc_stores",
            CpiCategory::Restaurants => "qc_restaurants",
        }
    }

    /// Fallback YoY inflation used when no forecast is available.
    pub fn default_yoy(self) -> f64 {
        match self {
            CpiCategory::Stores => 0.04,
            CpiCategory::Restaurants => 0.05,
        }
    }
}

/// One monthly observation. `date` is always a month end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "CPI_Food")]
    pub value: f64,
}

/// A cleaned monthly CPI series for one category.
///
/// Invariants (established by `io::series`): dates strictly increasing,
/// values finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSeries {
    pub category: CpiCategory,
    pub points: Vec<SeriesPoint>,
}

impl CleanSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Both category series produced by one cleaning run.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub stores: CleanSeries,
    pub restaurants: CleanSeries,
}

impl CategorySeries {
    pub fn get(&self, category: CpiCategory) -> &CleanSeries {
        match category {
            CpiCategory::Stores => &self.stores,
            CpiCategory::Restaurants => &self.restaurants,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CleanSeries> {
        [&self.stores, &self.restaurants].into_iter()
    }
}

/// Which trend model to fit or forecast with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// OLS on an integer time index.
    Linear,
    /// ARIMA(1,1,1) on the monthly series.
    Arima,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Linear, ModelKind::Arima];

    /// Label written to the `Model` column of forecast output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear(t)",
            ModelKind::Arima => "ARIMA(1,1,1)",
        }
    }

    /// File-name suffix for persisted artifacts.
    pub fn file_suffix(self) -> &'static str {
        match self {
            ModelKind::Linear => "lin",
            ModelKind::Arima => "arima",
        }
    }
}

/// Linear trend `y = intercept + slope * t` with `t = 0..n_obs-1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub intercept: f64,
    pub slope: f64,
}

/// ARIMA(1,1,1) parameters plus the state needed to forecast from the end of
/// the training sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArimaParams {
    /// AR(1) coefficient on the differenced series.
    pub phi: f64,
    /// MA(1) coefficient on the differenced series.
    pub theta: f64,
    /// Innovation variance (conditional sum of squares / n).
    pub sigma2: f64,
    /// Last observed level `y_T`.
    pub last_level: f64,
    /// Last observed difference `w_T = y_T - y_{T-1}`.
    pub last_diff: f64,
    /// Last in-sample innovation `e_T`.
    pub last_resid: f64,
}

/// Fitted model state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FittedModel {
    Linear(LinearParams),
    Arima(ArimaParams),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedModel::Linear(_) => ModelKind::Linear,
            FittedModel::Arima(_) => ModelKind::Arima,
        }
    }
}

/// A persisted trained model: parameters plus the training cutoff.
///
/// Created once by `models::train_category`, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub tool: String,
    pub category: CpiCategory,
    pub last_date: NaiveDate,
    pub n_obs: usize,
    pub model: FittedModel,
}

/// One forecast month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "CPI_Food")]
    pub value: f64,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "YoY_inflation")]
    pub yoy_inflation: f64,
    /// Set when the YoY value came from the fill policy instead of a
    /// real value twelve months earlier. Not persisted.
    #[serde(skip)]
    pub yoy_imputed: bool,
}
