//! Month-end date arithmetic.
//!
//! Every date in a series or forecast is the last day of its month, so monthly
//! offsets never drift (Jan 31 + 1 month is Feb 28/29, not Mar 3).

use chrono::{Datelike, Months, NaiveDate};

/// English month names, lowercase, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Last day of `year`-`month`, or `None` for an invalid month.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

/// Snap any date to the last day of its month.
pub fn to_month_end(date: NaiveDate) -> NaiveDate {
    month_end(date.year(), date.month()).unwrap_or(date)
}

/// Month end `k` months after the month containing `date`.
pub fn month_end_after(date: NaiveDate, k: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    let shifted = first.checked_add_months(Months::new(k))?;
    month_end(shifted.year(), shifted.month())
}

/// Number of whole months from `from` to `to` (negative if `to` is earlier).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + (to.month() as i64 - from.month() as i64)
}

/// Parse a `"<Month> <Year>"` label (e.g. `"January 2020"`, `"march 1999"`)
/// into the month-end date. Month names match case-insensitively.
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    let mut parts = label.split_whitespace();
    let month_name = parts.next()?.to_ascii_lowercase();
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = MONTH_NAMES.iter().position(|m| *m == month_name)? as u32 + 1;
    month_end(year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end(2024, 2), Some(d(2024, 2, 29)));
        assert_eq!(month_end(2025, 2), Some(d(2025, 2, 28)));
        assert_eq!(month_end(2025, 12), Some(d(2025, 12, 31)));
        assert_eq!(month_end(2025, 13), None);
    }

    #[test]
    fn month_end_after_does_not_drift() {
        let jan = d(2025, 1, 31);
        assert_eq!(month_end_after(jan, 1), Some(d(2025, 2, 28)));
        assert_eq!(month_end_after(jan, 2), Some(d(2025, 3, 31)));
        assert_eq!(month_end_after(jan, 12), Some(d(2026, 1, 31)));
    }

    #[test]
    fn parses_month_labels_case_insensitively() {
        assert_eq!(parse_month_label("January 2020"), Some(d(2020, 1, 31)));
        assert_eq!(parse_month_label("  SEPTEMBER 2023 "), Some(d(2023, 9, 30)));
        assert_eq!(parse_month_label("Sept 2023"), None);
        assert_eq!(parse_month_label("Products and product groups"), None);
        assert_eq!(parse_month_label("2020"), None);
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(d(2024, 11, 30), d(2025, 2, 28)), 3);
        assert_eq!(months_between(d(2025, 2, 28), d(2024, 11, 30)), -3);
    }
}
