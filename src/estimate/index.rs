//! Year -> CPI index, normalized so the base year is exactly 100.
//!
//! Built from a simple wide CSV:
//!
//! ```text
//! Month and Year, July 1980, August 1980, ...
//! CPI,            52.0,      53.0,        ...
//! ```
//!
//! Steps:
//! 1. sniff the delimiter, strip a BOM, keep the first two non-blank rows
//! 2. average monthly cells per calendar year
//! 3. normalize to the base year (or the last year when the base is absent)
//! 4. extrapolate to `end_year` with the CAGR of the last 5 years
//!    (`fallback_cagr` when that is zero or undefined)
//! 5. re-normalize to the base year and round to 2 decimals

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::domain::MONTH_NAMES;
use crate::error::AppError;
use crate::io::decode_export;

pub const BASE_YEAR: i32 = 2025;
pub const DEFAULT_END_YEAR: i32 = 2035;
pub const DEFAULT_FALLBACK_CAGR: f64 = 0.025;

/// Years of history used for the growth estimate.
const CAGR_WINDOW: usize = 5;

/// Furthest `end_year` accepted past the last observed year.
pub const MAX_EXTRAPOLATION_YEARS: i32 = 100;

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// CPI index by year. One entry per year between the first and last key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpiIndex {
    by_year: BTreeMap<i32, f64>,
}

impl CpiIndex {
    /// `100 * (1 + growth)^(year - BASE_YEAR)` for each year in `start..=end`.
    pub fn constant_growth(start: i32, end: i32, annual_growth: f64) -> Self {
        let by_year = (start..=end)
            .map(|y| (y, 100.0 * (1.0 + annual_growth).powi(y - BASE_YEAR)))
            .collect();
        Self { by_year }
    }

    /// Build from a wide monthly CSV file.
    pub fn from_csv(path: &Path, end_year: i32, fallback_cagr: f64) -> Result<Self, AppError> {
        let bytes = std::fs::read(path).map_err(|e| AppError::from_open(&e, "CPI CSV", path))?;
        Self::from_csv_text(&decode_export(&bytes), end_year, fallback_cagr)
    }

    /// Build from wide monthly CSV text.
    pub fn from_csv_text(text: &str, end_year: i32, fallback_cagr: f64) -> Result<Self, AppError> {
        let (headers, values) = first_two_rows(text)?;
        let averages = yearly_averages(&headers, &values)?;
        let mut index = normalize_to_base(&averages);

        let mut cagr = estimate_cagr(&index, CAGR_WINDOW);
        if cagr == 0.0 {
            cagr = fallback_cagr;
        }
        debug!(cagr, years = index.len(), end_year, "extrapolating CPI index");

        let (last_year, mut last_val) = index
            .iter()
            .next_back()
            .map(|(y, v)| (*y, *v))
            .ok_or_else(|| AppError::parse("No numeric CPI values parsed."))?;
        if end_year > last_year.saturating_add(MAX_EXTRAPOLATION_YEARS) {
            return Err(AppError::invalid_argument(format!(
                "End year {end_year} is more than {MAX_EXTRAPOLATION_YEARS} years past the last CPI year {last_year}."
            )));
        }
        for y in (last_year + 1)..=end_year {
            last_val *= 1.0 + cagr;
            index.insert(y, last_val);
        }

        let mut index = fill_year_gaps(index);
        // Rounding only applies to an index rebased on the base year.
        if let Some(base) = index.get(&BASE_YEAR).copied().filter(|b| *b != 0.0) {
            for v in index.values_mut() {
                *v = (*v / base * 100.0 * 100.0).round() / 100.0;
            }
        }
        Ok(Self { by_year: index })
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.by_year.get(&year).copied()
    }

    pub fn min_year(&self) -> Option<i32> {
        self.by_year.keys().next().copied()
    }

    pub fn max_year(&self) -> Option<i32> {
        self.by_year.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.by_year.iter().map(|(y, v)| (*y, *v))
    }

    /// `year` clamped into the index range.
    pub fn clamp_year(&self, year: i32) -> Option<i32> {
        Some(year.clamp(self.min_year()?, self.max_year()?))
    }

    /// `CPI[year] / 100` with the year clamped to the index range.
    ///
    /// Returns `1.0` (base-year dollars) when the index is empty, lacks the
    /// base year, or holds a non-positive value.
    pub fn multiplier(&self, year: i32) -> f64 {
        if self.get(BASE_YEAR).is_none() {
            return 1.0;
        }
        let Some(clamped) = self.clamp_year(year) else {
            return 1.0;
        };
        match self.get(clamped) {
            Some(v) if v > 0.0 && v.is_finite() => v / 100.0,
            _ => 1.0,
        }
    }
}

fn first_two_rows(text: &str) -> Result<(Vec<String>, Vec<String>), AppError> {
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = sniff_delimiter(text.lines().next().unwrap_or_default());
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::with_capacity(2);
    for record in reader.records() {
        let record = record.map_err(|e| AppError::parse(format!("Invalid CPI CSV: {e}")))?;
        if record.iter().any(|c| !c.trim().is_empty()) {
            rows.push(record.iter().map(|c| c.trim().to_string()).collect::<Vec<_>>());
        }
        if rows.len() == 2 {
            break;
        }
    }
    if rows.len() < 2 {
        return Err(AppError::parse("CPI CSV must have at least two rows (header + CPI row)."));
    }
    let values = rows.pop().unwrap_or_default();
    let headers = rows.pop().unwrap_or_default();
    Ok((headers, values))
}

/// Pick the candidate delimiter that occurs most often in the header line.
fn sniff_delimiter(line: &str) -> u8 {
    DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, line.bytes().filter(|b| *b == d).count()))
        .filter(|(_, n)| *n > 0)
        .max_by_key(|(_, n)| *n)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

/// Find a `"<Month> <YYYY>"` pair (19xx/20xx) inside a header cell.
fn parse_month_year(cell: &str) -> Option<i32> {
    let tokens: Vec<&str> = cell.split_whitespace().collect();
    tokens.windows(2).find_map(|pair| {
        let word = pair[0].trim_matches(|c: char| !c.is_ascii_alphabetic());
        let year = pair[1].trim_matches(|c: char| !c.is_ascii_digit());
        let is_year = year.len() == 4 && (year.starts_with("19") || year.starts_with("20"));
        if word.is_empty() || !is_year {
            return None;
        }
        MONTH_NAMES
            .contains(&word.to_ascii_lowercase().as_str())
            .then(|| year.parse().ok())
            .flatten()
    })
}

fn yearly_averages(headers: &[String], values: &[String]) -> Result<BTreeMap<i32, f64>, AppError> {
    if values.len() < 2 {
        return Err(AppError::parse("Second row lacks CPI values."));
    }

    let mut recognized = 0usize;
    let mut sums: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    // Column 0 holds the row labels ("Month and Year" / "CPI").
    for (header, value) in headers.iter().zip(values.iter()).skip(1) {
        let Some(year) = parse_month_year(header) else { continue };
        recognized += 1;
        let Some(v) = value.parse::<f64>().ok().filter(|v| v.is_finite()) else {
            continue;
        };
        let entry = sums.entry(year).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }

    if recognized == 0 {
        return Err(AppError::parse("No month-year headers recognized in CPI CSV."));
    }
    if sums.is_empty() {
        return Err(AppError::parse("No numeric CPI values parsed."));
    }
    Ok(sums
        .into_iter()
        .map(|(y, (sum, n))| (y, sum / n as f64))
        .collect())
}

fn normalize_to_base(averages: &BTreeMap<i32, f64>) -> BTreeMap<i32, f64> {
    let base = match averages.get(&BASE_YEAR) {
        Some(b) if *b != 0.0 => *b,
        _ => averages
            .values()
            .next_back()
            .copied()
            .filter(|v| *v != 0.0)
            .unwrap_or(1.0),
    };
    averages.iter().map(|(y, v)| (*y, v / base * 100.0)).collect()
}

/// Compound annual growth over the last `window` years (at least 2).
fn estimate_cagr(index: &BTreeMap<i32, f64>, window: usize) -> f64 {
    if index.len() < 2 {
        return 0.0;
    }
    let years: Vec<i32> = index.keys().copied().collect();
    let used = &years[years.len().saturating_sub(window)..];
    let (first, last) = (used[0], used[used.len() - 1]);
    let (v0, v1) = (index[&first], index[&last]);
    if v0 <= 0.0 || last == first {
        return 0.0;
    }
    (v1 / v0).powf(1.0 / (last - first) as f64) - 1.0
}

fn fill_year_gaps(by_year: BTreeMap<i32, f64>) -> BTreeMap<i32, f64> {
    let (Some(&min), Some(&max)) = (by_year.keys().next(), by_year.keys().next_back()) else {
        return by_year;
    };
    let mut out = BTreeMap::new();
    let mut last = by_year[&min];
    for y in min..=max {
        if let Some(v) = by_year.get(&y) {
            last = *v;
        }
        out.insert(y, last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two months per year, 2021..=2025, growing 2% a year.
    fn sample_csv(delim: char) -> String {
        let mut header = vec!["Month and Year".to_string()];
        let mut values = vec!["CPI".to_string()];
        for (i, year) in (2021..=2025).enumerate() {
            let level = 100.0 * 1.02f64.powi(i as i32);
            for month in ["January", "July"] {
                header.push(format!("{month} {year}"));
                values.push(format!("{level:.4}"));
            }
        }
        let sep = delim.to_string();
        format!("\u{feff}{}\n{}\n", header.join(sep.as_str()), values.join(sep.as_str()))
    }

    #[test]
    fn base_year_is_exactly_100() {
        let index = CpiIndex::from_csv_text(&sample_csv(','), 2030, DEFAULT_FALLBACK_CAGR).unwrap();
        assert_eq!(index.get(BASE_YEAR), Some(100.0));
        assert_eq!(index.min_year(), Some(2021));
        assert_eq!(index.max_year(), Some(2030));
        // Extrapolated with the observed ~2% CAGR.
        assert!((index.get(2026).unwrap() - 102.0).abs() < 0.02);
        assert_eq!(index.iter().count(), 10);
    }

    #[test]
    fn sniffs_semicolons_and_tabs() {
        let comma = CpiIndex::from_csv_text(&sample_csv(','), 2027, 0.0).unwrap();
        let semi = CpiIndex::from_csv_text(&sample_csv(';'), 2027, 0.0).unwrap();
        let tab = CpiIndex::from_csv_text(&sample_csv('\t'), 2027, 0.0).unwrap();
        assert_eq!(comma, semi);
        assert_eq!(comma, tab);
    }

    #[test]
    fn flat_history_uses_fallback_growth() {
        let csv = "Month and Year,January 2024,January 2025\nCPI,150,150\n";
        let index = CpiIndex::from_csv_text(csv, 2026, 0.03).unwrap();
        assert_eq!(index.get(2024), Some(100.0));
        assert_eq!(index.get(2026), Some(103.0));
    }

    #[test]
    fn missing_base_year_normalizes_to_last_year() {
        let csv = "Month and Year,March 2019,March 2020\nCPI,90,100\n";
        let index = CpiIndex::from_csv_text(csv, 2020, 0.0).unwrap();
        assert_eq!(index.get(2020), Some(100.0));
        assert_eq!(index.get(2019), Some(90.0));
        // Without the base year the multiplier stays neutral.
        assert_eq!(index.multiplier(2020), 1.0);
    }

    #[test]
    fn malformed_inputs_are_parse_errors() {
        assert!(CpiIndex::from_csv_text("only one row\n", 2030, 0.0).is_err());
        assert!(CpiIndex::from_csv_text("a,b,c\nCPI,1,2\n", 2030, 0.0).is_err());
        assert!(CpiIndex::from_csv_text("x,May 2020\nCPI,n/a\n", 2030, 0.0).is_err());
    }

    #[test]
    fn multiplier_clamps_years() {
        let index = CpiIndex::constant_growth(2025, 2030, 0.03);
        assert_eq!(index.multiplier(2025), 1.0);
        assert_eq!(index.multiplier(2040), index.multiplier(2030));
        assert_eq!(index.multiplier(1990), index.multiplier(2025));
        assert_eq!(CpiIndex::default().multiplier(2030), 1.0);
    }

    #[test]
    fn interior_gaps_carry_previous_year() {
        let csv = "Month and Year,June 2023,June 2025\nCPI,90,100\n";
        let index = CpiIndex::from_csv_text(csv, 2025, 0.0).unwrap();
        assert_eq!(index.get(2024), Some(90.0));
        assert_eq!(index.iter().count(), 3);
    }

    #[test]
    fn unrebased_index_is_not_rounded() {
        let csv = "Month and Year,March 2019,March 2020\nCPI,30,90.1234\n";
        let index = CpiIndex::from_csv_text(csv, 2020, 0.0).unwrap();
        let expected = 30.0 / 90.1234 * 100.0;
        assert_eq!(index.get(2019), Some(expected));
        assert_ne!(index.get(2019), Some((expected * 100.0).round() / 100.0));
    }

    #[test]
    fn far_end_year_is_rejected() {
        let csv = "Month and Year,January 2024,January 2025\nCPI,150,153\n";
        let err = CpiIndex::from_csv_text(csv, i32::MAX, 0.0).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
        assert!(CpiIndex::from_csv_text(csv, 2025 + MAX_EXTRAPOLATION_YEARS, 0.0).is_ok());
    }

    #[test]
    fn month_year_header_detection() {
        assert_eq!(parse_month_year("July 1980"), Some(1980));
        assert_eq!(parse_month_year("CPI for August 2021 (est.)"), Some(2021));
        assert_eq!(parse_month_year("Smarch 2021"), None);
        assert_eq!(parse_month_year("July 1880"), None);
    }
}
