//! Raw export normalization.
//!
//! The statistical-agency download is a "wide" table wrapped in a long preface
//! and trailing footnotes. This module cuts it down to the three rows the rest
//! of the pipeline needs:
//!
//! - the month header row (first cell renamed to `Products and product groups`)
//! - the "Food purchased from stores" row
//! - the "Food purchased from restaurants" row
//!
//! Anything else (preface, unit row, other product groups, footnotes) is dropped.
//! A missing header or category row is fatal for the run.

use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::CpiCategory;
use crate::error::AppError;

/// First cell of the row that precedes the month header.
const GEOGRAPHY_HEADER: &str = "Geography";

/// Replacement for the first cell of the month header row.
pub const LABEL_COLUMN: &str = "Products and product groups";

/// The 3-row table extracted from a raw export.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimalTable {
    pub header: StringRecord,
    pub stores: StringRecord,
    pub restaurants: StringRecord,
}

impl MinimalTable {
    /// Data rows keyed by the category they were matched as.
    pub fn rows(&self) -> [(CpiCategory, &StringRecord); 2] {
        [
            (CpiCategory::Stores, &self.stores),
            (CpiCategory::Restaurants, &self.restaurants),
        ]
    }

    /// Render as CSV text: header line plus the two data lines.
    pub fn to_csv_string(&self) -> Result<String, AppError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        for record in [&self.header, &self.stores, &self.restaurants] {
            writer
                .write_record(record)
                .map_err(|e| AppError::io(format!("Failed to render minimal table: {e}")))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::io(format!("Failed to render minimal table: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::io(format!("Minimal table is not UTF-8: {e}")))
    }
}

/// Write the minimal table as CSV, creating parent directories.
pub fn write_minimal_csv(path: &Path, table: &MinimalTable) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", parent.display())))?;
    }
    std::fs::write(path, table.to_csv_string()?)
        .map_err(|e| AppError::io(format!("Failed to write minimal table '{}': {e}", path.display())))
}

/// Read a raw export from disk, decoding permissively.
pub fn read_raw_export(path: &Path) -> Result<String, AppError> {
    let bytes = std::fs::read(path).map_err(|e| AppError::from_open(&e, "raw CPI export", path))?;
    Ok(decode_export(&bytes))
}

/// Decode bytes as UTF-8, dropping invalid sequences and a leading BOM.
pub fn decode_export(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Extract the minimal table from raw export text.
pub fn extract_csv_block(raw: &str) -> Result<MinimalTable, AppError> {
    let lines: Vec<&str> = raw.lines().collect();

    let geo_idx = lines
        .iter()
        .position(|line| first_cell(line).as_deref() == Some(GEOGRAPHY_HEADER))
        .ok_or_else(|| AppError::parse("Could not find 'Geography' header row in CPI export."))?;

    let months_line = lines
        .get(geo_idx + 1)
        .ok_or_else(|| AppError::parse("CPI export ends right after the 'Geography' row."))?;
    let mut header = parse_line(months_line)
        .ok_or_else(|| AppError::parse("Could not parse the month header row of the CPI export."))?;
    header = rename_first_cell(&header, LABEL_COLUMN);

    // Skip the unit row that follows the month header.
    let mut stores = None;
    let mut restaurants = None;
    for line in lines.iter().skip(geo_idx + 3) {
        let Some(cell) = first_cell(line) else { continue };
        if stores.is_none() && matches_category(&cell, CpiCategory::Stores) {
            stores = parse_line(line);
        } else if restaurants.is_none() && matches_category(&cell, CpiCategory::Restaurants) {
            restaurants = parse_line(line);
        }
        if stores.is_some() && restaurants.is_some() {
            break;
        }
    }

    match (stores, restaurants) {
        (Some(stores), Some(restaurants)) => {
            debug!(columns = header.len(), "extracted minimal CPI table");
            Ok(MinimalTable {
                header,
                stores,
                restaurants,
            })
        }
        _ => Err(AppError::parse(
            "Could not find both stores/restaurants rows in the CPI export.",
        )),
    }
}

/// Exact label match, or the label followed by a footnote marker (`"... 5"`).
fn matches_category(cell: &str, category: CpiCategory) -> bool {
    let label = category.label();
    if cell == label {
        return true;
    }
    match cell.strip_prefix(label) {
        Some(rest) => {
            rest.starts_with(' ')
                && rest
                    .trim()
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == ',' || c.is_whitespace())
                && !rest.trim().is_empty()
        }
        None => false,
    }
}

fn parse_line(line: &str) -> Option<StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader.records().next()?.ok()
}

fn first_cell(line: &str) -> Option<String> {
    let record = parse_line(line)?;
    record.get(0).map(|s| s.trim().to_string())
}

fn rename_first_cell(record: &StringRecord, name: &str) -> StringRecord {
    let mut out = StringRecord::new();
    out.push_field(name);
    for field in record.iter().skip(1) {
        out.push_field(field);
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A small export shaped like the real download.
    pub(crate) const SAMPLE_EXPORT: &str = "\u{feff}\"Consumer Price Index, monthly, not seasonally adjusted 1\"
\"Frequency: Monthly\"
\"Table: 18-10-0004-01\"
\"Geography\",\"Quebec\",\"Quebec\",\"Quebec\"
\"Products and product groups 3 4\",\"January 2024\",\"February 2024\",\"March 2024\"
\"\",\"2002=100\",\"2002=100\",\"2002=100\"
\"All-items\",\"155.0\",\"155.9\",\"156.8\"
\"Food 5\",\"190.1\",\"191.0\",\"191.5\"
\"Food purchased from stores\",\"195.2\",\"196.0\",\"..\"
\"Food purchased from restaurants 6\",\"180.4\",\"181.1\",\"182.0\"
\"Symbol legend:\"
\"..\",\"not available for a specific reference period\"
";
}
