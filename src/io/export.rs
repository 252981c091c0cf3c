//! Forecast CSV files.
//!
//! Columns: `Date,CPI_Food,Model,YoY_inflation`. The export is meant to be easy
//! to consume in spreadsheets and is what the blender reads back.

use std::fs::{File, create_dir_all};
use std::path::Path;

use crate::domain::ForecastRow;
use crate::error::AppError;

/// Write forecast rows to a CSV file.
pub fn write_forecast_csv(path: &Path, rows: &[ForecastRow]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create forecast CSV '{}': {e}", path.display())))?;

    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write forecast CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush forecast CSV '{}': {e}", path.display())))?;

    Ok(())
}

/// Read forecast rows back. `yoy_imputed` is not persisted and reads as `false`.
pub fn read_forecast_csv(path: &Path) -> Result<Vec<ForecastRow>, AppError> {
    let file = File::open(path).map_err(|e| AppError::from_open(&e, "forecast CSV", path))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<ForecastRow>().enumerate() {
        let row = result.map_err(|e| {
            AppError::parse(format!("Invalid row {} in '{}': {e}", idx + 2, path.display()))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn forecast_csv_has_expected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fc.csv");
        let rows = vec![ForecastRow {
            date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            value: 201.5,
            model: "ARIMA(1,1,1)".to_string(),
            yoy_inflation: 0.031,
            yoy_imputed: true,
        }];
        write_forecast_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("Date,CPI_Food,Model,YoY_inflation")
        );

        let back = read_forecast_csv(&path).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].model, "ARIMA(1,1,1)");
        assert!(!back[0].yoy_imputed);
    }
}
