//! Fitting and forecasting for the linear and ARIMA(1,1,1) trend models.
//!
//! The two stages rely on two primitive operations:
//! - fit a model kind to a clean series (producing an immutable artifact)
//! - forecast `steps` values past the artifact's training cutoff

use tracing::info;

use crate::domain::{
    ARTIFACT_SCHEMA_VERSION, ArimaParams, CleanSeries, FittedModel, LinearParams, ModelArtifact,
    ModelKind,
};
use crate::error::AppError;
use crate::math::{ArimaEstimate, MIN_DIFFS, fit_arima_111, fit_time_trend, forecast_levels};

/// Tool name written into artifacts.
pub const TOOL_NAME: &str = "cpi";

/// Fit one model kind to a series.
pub fn fit(kind: ModelKind, series: &CleanSeries) -> Result<ModelArtifact, AppError> {
    let last_date = series.last_date().ok_or_else(|| {
        AppError::empty_series(format!("No observations to fit for '{}'.", series.category.label()))
    })?;
    let values = series.values();

    let model = match kind {
        ModelKind::Linear => {
            let (intercept, slope) = fit_time_trend(&values).ok_or_else(|| {
                AppError::model(format!(
                    "Linear trend needs at least 2 observations for '{}', got {}.",
                    series.category.label(),
                    values.len()
                ))
            })?;
            FittedModel::Linear(LinearParams { intercept, slope })
        }
        ModelKind::Arima => {
            let est = fit_arima_111(&values).ok_or_else(|| {
                AppError::model(format!(
                    "ARIMA(1,1,1) needs at least {} observations for '{}', got {}.",
                    MIN_DIFFS + 1,
                    series.category.label(),
                    values.len()
                ))
            })?;
            FittedModel::Arima(ArimaParams {
                phi: est.phi,
                theta: est.theta,
                sigma2: est.sigma2,
                last_level: est.last_level,
                last_diff: est.last_diff,
                last_resid: est.last_resid,
            })
        }
    };

    Ok(ModelArtifact {
        schema_version: ARTIFACT_SCHEMA_VERSION,
        tool: TOOL_NAME.to_string(),
        category: series.category,
        last_date,
        n_obs: values.len(),
        model,
    })
}

/// Fit every model kind to one category's series (full refit, no warm start).
pub fn train_category(series: &CleanSeries) -> Result<Vec<ModelArtifact>, AppError> {
    let mut out = Vec::with_capacity(ModelKind::ALL.len());
    for kind in ModelKind::ALL {
        let artifact = fit(kind, series)?;
        info!(
            category = series.category.tag(),
            model = kind.display_name(),
            n_obs = artifact.n_obs,
            last_date = %artifact.last_date,
            "trained model"
        );
        out.push(artifact);
    }
    Ok(out)
}

/// Forecast `steps` values after the artifact's `last_date`.
pub fn predict_ahead(artifact: &ModelArtifact, steps: usize) -> Vec<f64> {
    match artifact.model {
        FittedModel::Linear(p) => {
            let t_last = artifact.n_obs.saturating_sub(1) as f64;
            (1..=steps)
                .map(|k| p.intercept + p.slope * (t_last + k as f64))
                .collect()
        }
        FittedModel::Arima(p) => {
            let est = ArimaEstimate {
                phi: p.phi,
                theta: p.theta,
                sigma2: p.sigma2,
                last_level: p.last_level,
                last_diff: p.last_diff,
                last_resid: p.last_resid,
            };
            forecast_levels(&est, steps)
        }
    }
}
