//! Blending grocery and restaurant inflation.
//!
//! `blended = ratio * restaurant + (1 - ratio) * grocery`
//!
//! Rates come from the first forecast month's YoY inflation. Any problem
//! reading a forecast (missing file, bad row, no finite value) degrades to the
//! category's default rate with a warning; blending itself never fails.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::domain::{CpiCategory, ForecastRow};
use crate::io::read_forecast_csv;

/// Where a rate came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RateSource {
    /// Read from a forecast (file path, or `None` for in-memory rows).
    Forecast { path: Option<PathBuf> },
    /// The documented default was substituted.
    Default { reason: String },
}

/// One category's YoY inflation rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateReading {
    pub category: CpiCategory,
    pub rate: f64,
    pub source: RateSource,
}

impl RateReading {
    pub fn default_for(category: CpiCategory, reason: impl Into<String>) -> Self {
        Self {
            category,
            rate: category.default_yoy(),
            source: RateSource::Default { reason: reason.into() },
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self.source, RateSource::Default { .. })
    }
}

/// Weighted inflation plus the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendedInflation {
    pub rate: f64,
    pub eat_out_ratio: f64,
    pub grocery: RateReading,
    pub restaurant: RateReading,
}

/// Read the first finite YoY rate from a forecast CSV, or the default.
pub fn first_yoy(path: &Path, category: CpiCategory) -> RateReading {
    let reading = match read_forecast_csv(path) {
        Ok(rows) => {
            let mut r = first_yoy_from_rows(category, &rows);
            if let RateSource::Forecast { path: p } = &mut r.source {
                *p = Some(path.to_path_buf());
            }
            r
        }
        Err(e) => RateReading::default_for(category, e.to_string()),
    };
    log_reading(&reading);
    reading
}

/// Same as `first_yoy` for rows already in memory.
pub fn first_yoy_from_rows(category: CpiCategory, rows: &[ForecastRow]) -> RateReading {
    match rows.iter().map(|r| r.yoy_inflation).find(|v| v.is_finite()) {
        Some(rate) => RateReading {
            category,
            rate,
            source: RateSource::Forecast { path: None },
        },
        None => RateReading::default_for(category, "forecast has no finite YoY_inflation value"),
    }
}

/// Blend two readings. Ratio is clamped to `[0, 1]`; non-finite ratio counts as 0.
pub fn blend(grocery: RateReading, restaurant: RateReading, eat_out_ratio: f64) -> BlendedInflation {
    let ratio = if eat_out_ratio.is_finite() {
        eat_out_ratio.clamp(0.0, 1.0)
    } else {
        warn!(eat_out_ratio, "non-finite eating-out ratio; using 0");
        0.0
    };
    let grocery = sanitize(grocery);
    let restaurant = sanitize(restaurant);
    let rate = ratio * restaurant.rate + (1.0 - ratio) * grocery.rate;
    BlendedInflation {
        rate,
        eat_out_ratio: ratio,
        grocery,
        restaurant,
    }
}

/// Blend the on-disk forecasts configured in `config`.
pub fn blended_food_cpi(config: &PipelineConfig, eat_out_ratio: f64) -> BlendedInflation {
    let grocery = first_yoy(&config.forecast_path(CpiCategory::Stores), CpiCategory::Stores);
    let restaurant = first_yoy(
        &config.forecast_path(CpiCategory::Restaurants),
        CpiCategory::Restaurants,
    );
    let blended = blend(grocery, restaurant, eat_out_ratio);
    info!(
        blended = blended.rate,
        stores = blended.grocery.rate,
        restaurants = blended.restaurant.rate,
        "blended food CPI"
    );
    blended
}

fn sanitize(reading: RateReading) -> RateReading {
    if reading.rate.is_finite() {
        reading
    } else {
        let r = RateReading::default_for(reading.category, "non-finite rate");
        log_reading(&r);
        r
    }
}

fn log_reading(reading: &RateReading) {
    match &reading.source {
        RateSource::Default { reason } => warn!(
            category = reading.category.tag(),
            default = reading.rate,
            reason = %reason,
            "forecast not usable; using default YoY inflation"
        ),
        RateSource::Forecast { .. } => info!(
            category = reading.category.tag(),
            yoy = reading.rate,
            "read YoY inflation"
        ),
    }
}
