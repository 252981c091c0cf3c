//! Wide-to-long reshaping and clean series artifacts.
//!
//! Each cell of the minimal table becomes a `(category, month, value)` triple.
//! Cells that do not parse are dropped (not an error):
//!
//! - column labels that are not `"<Month> <Year>"`
//! - values that are not finite numbers (`..`, `F`, blanks)
//!
//! The result is one strictly increasing series per category.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::debug;

use crate::domain::{
    CategorySeries, CleanSeries, CpiCategory, SeriesPoint, parse_month_label, to_month_end,
};
use crate::error::AppError;
use crate::io::normalize::MinimalTable;

/// Build per-category series from the minimal table.
///
/// Fails with `EmptySeries` when both categories end up empty.
pub fn build_series(table: &MinimalTable) -> Result<CategorySeries, AppError> {
    let dates: Vec<_> = table
        .header
        .iter()
        .skip(1)
        .map(parse_month_label)
        .collect();

    let mut stores = Vec::new();
    let mut restaurants = Vec::new();
    let mut dropped = 0usize;

    for (category, row) in table.rows() {
        let target = match category {
            CpiCategory::Stores => &mut stores,
            CpiCategory::Restaurants => &mut restaurants,
        };

        for (cell, date) in row.iter().skip(1).zip(dates.iter()) {
            match (date, parse_value(cell)) {
                (Some(date), Some(value)) => target.push(SeriesPoint { date: *date, value }),
                _ => dropped += 1,
            }
        }
    }

    let series = CategorySeries {
        stores: finalize(CpiCategory::Stores, stores),
        restaurants: finalize(CpiCategory::Restaurants, restaurants),
    };
    debug!(
        stores = series.stores.len(),
        restaurants = series.restaurants.len(),
        dropped,
        "built category series"
    );

    if series.stores.is_empty() && series.restaurants.is_empty() {
        return Err(AppError::empty_series(
            "No valid (month, value) cells remain for either CPI category after cleaning.",
        ));
    }
    Ok(series)
}

/// Snap dates to month end, sort ascending and collapse duplicate months
/// (last value wins).
pub fn finalize(category: CpiCategory, mut points: Vec<SeriesPoint>) -> CleanSeries {
    points.retain(|p| p.value.is_finite());
    for p in &mut points {
        p.date = to_month_end(p.date);
    }
    // Stable sort keeps input order within a month so "last wins" is well defined.
    points.sort_by_key(|p| p.date);
    let mut out: Vec<SeriesPoint> = Vec::with_capacity(points.len());
    for p in points {
        match out.last_mut() {
            Some(last) if last.date == p.date => *last = p,
            _ => out.push(p),
        }
    }
    CleanSeries { category, points: out }
}

fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim().replace(',', "");
    let v = cell.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Write a clean series as `Date,CPI_Food`.
pub fn write_clean_csv(path: &Path, series: &CleanSeries) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create clean CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    for p in &series.points {
        writer
            .serialize(p)
            .map_err(|e| AppError::io(format!("Failed to write clean CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush clean CSV '{}': {e}", path.display())))?;
    Ok(())
}

/// Read a clean series written by `write_clean_csv`.
///
/// Rows are re-validated so a hand-edited file still satisfies the series
/// invariants.
pub fn read_clean_csv(path: &Path, category: CpiCategory) -> Result<CleanSeries, AppError> {
    let file = File::open(path).map_err(|e| AppError::from_open(&e, "clean CSV", path))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut points = Vec::new();
    for (idx, result) in reader.deserialize::<SeriesPoint>().enumerate() {
        let point = result.map_err(|e| {
            AppError::parse(format!("Invalid row {} in '{}': {e}", idx + 2, path.display()))
        })?;
        points.push(point);
    }
    Ok(finalize(category, points))
}
