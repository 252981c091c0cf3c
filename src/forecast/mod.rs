//! Forecasting past the training cutoff, with year-over-year inflation.
//!
//! Given a trained artifact and the history it was trained on:
//!
//! 1. forecast `N` values with the model's native routine
//! 2. stamp them on the `N` month ends after `last_date`
//! 3. lay history on a month-end grid (forward-filling gaps) and append the forecast
//! 4. compute YoY for each forecast month against the value 12 months earlier,
//!    which may be history for the first 12 forecast months
//!
//! YoY is undefined when the 12-month base predates the history (or is zero).
//! Undefined values are forward-filled, then back-filled, and finally default
//! to `0.0`. Rows produced this way carry `yoy_imputed = true`: for short
//! histories the first horizons report zero inflation, which understates it.

use tracing::{debug, warn};

use crate::domain::{CleanSeries, ForecastRow, ModelArtifact, month_end_after, months_between};
use crate::error::AppError;
use crate::models::predict_ahead;

/// Default horizon (months ahead).
pub const DEFAULT_HORIZON: usize = 12;

/// Lag used for year-over-year comparisons on monthly data.
const YOY_LAG: usize = 12;

/// Forecast `horizon` months after `artifact.last_date`.
pub fn forecast(
    artifact: &ModelArtifact,
    history: &CleanSeries,
    horizon: usize,
) -> Result<Vec<ForecastRow>, AppError> {
    if horizon == 0 {
        return Err(AppError::invalid_argument("Forecast horizon must be at least 1 month."));
    }
    if history.category != artifact.category {
        return Err(AppError::invalid_argument(format!(
            "History for '{}' cannot be combined with a model trained on '{}'.",
            history.category.label(),
            artifact.category.label()
        )));
    }

    let dates = (1..=horizon)
        .map(|k| month_end_after(artifact.last_date, k as u32))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AppError::model("Forecast dates overflow the calendar."))?;

    let preds = predict_ahead(artifact, horizon);
    if preds.iter().any(|v| !v.is_finite()) {
        return Err(AppError::model(format!(
            "Non-finite {} forecast for '{}'.",
            artifact.model.kind().display_name(),
            artifact.category.label()
        )));
    }

    let mut combined = history_grid(history, artifact.last_date);
    let n_hist = combined.len();
    combined.extend(preds.iter().map(|v| Some(*v)));

    let raw_yoy: Vec<Option<f64>> = (0..horizon)
        .map(|i| {
            let p = n_hist + i;
            let current = combined[p]?;
            let base = combined[p.checked_sub(YOY_LAG)?]?;
            if base == 0.0 || !base.is_finite() {
                return None;
            }
            Some((current - base) / base)
        })
        .collect();
    let yoy = fill_gaps(&raw_yoy);

    let imputed = yoy.iter().filter(|(_, imputed)| *imputed).count();
    if imputed > 0 {
        warn!(
            category = artifact.category.tag(),
            imputed,
            horizon,
            "YoY inflation lacks a 12-month base for some forecast months; filled values used"
        );
    }
    debug!(
        category = artifact.category.tag(),
        history_months = n_hist,
        horizon,
        "forecast complete"
    );

    let label = artifact.model.kind().display_name().to_string();
    Ok(dates
        .into_iter()
        .zip(preds)
        .zip(yoy)
        .map(|((date, value), (yoy_inflation, yoy_imputed))| ForecastRow {
            date,
            value,
            model: label.clone(),
            yoy_inflation,
            yoy_imputed,
        })
        .collect())
}

/// History values on a contiguous month-end grid ending at `last_date`,
/// forward-filled. Observations after `last_date` are ignored.
fn history_grid(history: &CleanSeries, last_date: chrono::NaiveDate) -> Vec<Option<f64>> {
    let Some(start) = history.first_date().filter(|d| *d <= last_date) else {
        return Vec::new();
    };
    let len = (months_between(start, last_date) + 1).max(0) as usize;
    let mut grid = vec![None; len];
    for p in history.points.iter().filter(|p| p.date <= last_date) {
        let idx = months_between(start, p.date);
        if (0..len as i64).contains(&idx) {
            grid[idx as usize] = Some(p.value);
        }
    }
    let mut last = None;
    for slot in grid.iter_mut() {
        match slot {
            Some(v) => last = Some(*v),
            None => *slot = last,
        }
    }
    grid
}

/// Forward-fill, then back-fill, then default to `0.0`.
///
/// Returns `(value, imputed)` pairs.
pub fn fill_gaps(values: &[Option<f64>]) -> Vec<(f64, bool)> {
    let mut out: Vec<(Option<f64>, bool)> = values.iter().map(|v| (*v, v.is_none())).collect();

    let mut last = None;
    for (v, _) in out.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => *v = last,
        }
    }
    let mut next = None;
    for (v, _) in out.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => *v = next,
        }
    }

    out.into_iter()
        .map(|(v, imputed)| (v.unwrap_or(0.0), imputed))
        .collect()
}
