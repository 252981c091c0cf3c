//! Batch stages shared by the stage-by-stage subcommands and `cpi run`.
//!
//! clean (raw export -> clean series) -> train (series -> model artifacts)
//! -> predict (artifact + history -> forecast rows)
//!
//! Every stage writes its artifacts to disk. `run_all` also hands the typed
//! outputs straight to the next stage instead of re-reading them.

use std::path::Path;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::domain::{CategorySeries, CleanSeries, CpiCategory, ForecastRow, ModelArtifact, ModelKind};
use crate::error::AppError;
use crate::forecast::forecast;
use crate::io::{
    build_series, extract_csv_block, read_clean_csv, read_model_json, read_raw_export,
    write_clean_csv, write_forecast_csv, write_minimal_csv, write_model_json,
};
use crate::models::train_category;

/// Forecast for one category.
#[derive(Debug, Clone)]
pub struct CategoryForecast {
    pub category: CpiCategory,
    pub kind: ModelKind,
    pub rows: Vec<ForecastRow>,
}

/// All outputs of a `cpi run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: CategorySeries,
    pub artifacts: Vec<ModelArtifact>,
    pub forecasts: Vec<CategoryForecast>,
}

/// Normalize a raw export and write both clean series.
pub fn clean_stage(config: &PipelineConfig, raw_path: &Path) -> Result<CategorySeries, AppError> {
    let raw = read_raw_export(raw_path)?;
    let table = extract_csv_block(&raw)?;
    write_minimal_csv(&config.minimal_path(), &table)?;
    let series = build_series(&table)?;
    for s in series.iter() {
        let path = config.clean_path(s.category);
        write_clean_csv(&path, s)?;
        info!(
            category = s.category.tag(),
            n_obs = s.len(),
            path = %path.display(),
            "wrote clean series"
        );
    }
    Ok(series)
}

/// Load both clean series from disk.
pub fn load_series(config: &PipelineConfig) -> Result<CategorySeries, AppError> {
    Ok(CategorySeries {
        stores: read_clean_csv(&config.clean_path(CpiCategory::Stores), CpiCategory::Stores)?,
        restaurants: read_clean_csv(
            &config.clean_path(CpiCategory::Restaurants),
            CpiCategory::Restaurants,
        )?,
    })
}

/// Fit every model kind for each non-empty category and persist the artifacts.
pub fn train_stage(config: &PipelineConfig, series: &CategorySeries) -> Result<Vec<ModelArtifact>, AppError> {
    let mut artifacts = Vec::new();
    for s in series.iter() {
        if s.is_empty() {
            warn!(category = s.category.tag(), "no observations; skipping training");
            continue;
        }
        for artifact in train_category(s)? {
            let path = config.model_path(artifact.category, artifact.model.kind());
            write_model_json(&path, &artifact)?;
            artifacts.push(artifact);
        }
    }
    if artifacts.is_empty() {
        return Err(AppError::empty_series("No category has observations to train on."));
    }
    Ok(artifacts)
}

/// Forecast one category with an in-memory artifact and write the CSV.
pub fn predict_category(
    config: &PipelineConfig,
    artifact: &ModelArtifact,
    history: &CleanSeries,
    horizon: usize,
) -> Result<CategoryForecast, AppError> {
    let rows = forecast(artifact, history, horizon)?;
    let path = config.forecast_path(artifact.category);
    write_forecast_csv(&path, &rows)?;
    info!(
        category = artifact.category.tag(),
        model = artifact.model.kind().display_name(),
        horizon,
        path = %path.display(),
        "wrote forecast"
    );
    Ok(CategoryForecast {
        category: artifact.category,
        kind: artifact.model.kind(),
        rows,
    })
}

/// Forecast every non-empty category from artifacts on disk.
pub fn predict_stage(
    config: &PipelineConfig,
    series: &CategorySeries,
    kind: ModelKind,
    horizon: usize,
) -> Result<Vec<CategoryForecast>, AppError> {
    let mut out = Vec::new();
    for s in series.iter() {
        if s.is_empty() {
            warn!(category = s.category.tag(), "no observations; skipping forecast");
            continue;
        }
        let artifact = read_model_json(&config.model_path(s.category, kind))?;
        out.push(predict_category(config, &artifact, s, horizon)?);
    }
    Ok(out)
}

/// clean -> train -> predict in one process. Stops at the first failing stage.
pub fn run_all(
    config: &PipelineConfig,
    raw_path: &Path,
    kind: ModelKind,
    horizon: usize,
) -> Result<RunOutput, AppError> {
    let series = clean_stage(config, raw_path)?;
    let artifacts = train_stage(config, &series)?;

    let mut forecasts = Vec::new();
    for artifact in artifacts.iter().filter(|a| a.model.kind() == kind) {
        let history = series.get(artifact.category);
        forecasts.push(predict_category(config, artifact, history, horizon)?);
    }

    Ok(RunOutput {
        series,
        artifacts,
        forecasts,
    })
}
