//! CPI-index food cost estimator for a target year.
//!
//! ```text
//! monthly = weekly * 52/12 * eat_out_factor * store_tier * CPI[year] / 100
//! ```
//!
//! `weekly` is in base-year dollars; the result is in target-year dollars.

use crate::estimate::factor::{Factor, lookup};
use crate::estimate::index::CpiIndex;
use crate::estimate::{round_cents, sanitize_budget};

pub const WEEKS_PER_MONTH_YEARLY: f64 = 52.0 / 12.0;

pub const EAT_OUT_FACTORS: [(&str, f64); 4] = [
    ("never", 1.00),
    ("1-2x", 1.05),
    ("3-5x", 1.12),
    ("daily", 1.20),
];

pub const STORE_TIERS: [(&str, f64); 9] = [
    ("Maxi", 0.95),
    ("Super C", 0.95),
    ("Walmart", 0.96),
    ("Costco", 0.94),
    ("Metro", 1.02),
    ("Provigo", 1.05),
    ("Supermarché P.A.", 1.00),
    ("Adonis", 0.99),
    ("IGA", 1.03),
];

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyInputs {
    pub year: i32,
    pub eat_out: String,
    pub store: String,
    pub weekly_budget: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyEstimate {
    /// Monthly cost in target-year dollars, rounded to cents.
    pub monthly_cost: f64,
    /// Year actually read from the index after clamping (`None` if empty).
    pub index_year: Option<i32>,
    pub cpi_multiplier: f64,
    pub eat_out_factor: Factor,
    pub store_tier: Factor,
}

pub fn eat_out_factor(frequency: &str) -> Factor {
    lookup(&EAT_OUT_FACTORS, frequency, "eat_out_factor")
}

pub fn store_tier(store: &str) -> Factor {
    lookup(&STORE_TIERS, store, "store_tier")
}

/// Base-year monthly amount before behavior and CPI effects.
pub fn base_monthly(weekly_budget: f64) -> f64 {
    sanitize_budget(weekly_budget) * WEEKS_PER_MONTH_YEARLY
}

pub fn expected_monthly_food_cost_for_year(inputs: &YearlyInputs, index: &CpiIndex) -> YearlyEstimate {
    let eat = eat_out_factor(&inputs.eat_out);
    let store = store_tier(&inputs.store);
    let cpi_multiplier = index.multiplier(inputs.year);
    let monthly = base_monthly(inputs.weekly_budget) * eat.value() * store.value() * cpi_multiplier;
    YearlyEstimate {
        monthly_cost: round_cents(monthly),
        index_year: index.clamp_year(inputs.year),
        cpi_multiplier,
        eat_out_factor: eat,
        store_tier: store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::index::BASE_YEAR;

    fn inputs(year: i32, eat_out: &str, store: &str, weekly: f64) -> YearlyInputs {
        YearlyInputs {
            year,
            eat_out: eat_out.to_string(),
            store: store.to_string(),
            weekly_budget: weekly,
        }
    }

    #[test]
    fn base_year_is_behavior_only() {
        let index = CpiIndex::constant_growth(BASE_YEAR, 2035, 0.025);
        let est = expected_monthly_food_cost_for_year(&inputs(BASE_YEAR, "3-5x", "Metro", 120.0), &index);
        assert_eq!(est.monthly_cost, round_cents(120.0 * 52.0 / 12.0 * 1.12 * 1.02));
        assert_eq!(est.cpi_multiplier, 1.0);
    }

    #[test]
    fn later_years_scale_with_index() {
        let index = CpiIndex::constant_growth(BASE_YEAR, 2030, 0.03);
        let est = expected_monthly_food_cost_for_year(&inputs(2028, "never", "Costco", 100.0), &index);
        let expected = 100.0 * 52.0 / 12.0 * 0.94 * 1.03f64.powi(3);
        assert_eq!(est.monthly_cost, round_cents(expected));
    }

    #[test]
    fn years_are_clamped_to_index_range() {
        let index = CpiIndex::constant_growth(BASE_YEAR, 2030, 0.03);
        let at_max = expected_monthly_food_cost_for_year(&inputs(2030, "daily", "IGA", 90.0), &index);
        let beyond = expected_monthly_food_cost_for_year(&inputs(2099, "daily", "IGA", 90.0), &index);
        assert_eq!(at_max.monthly_cost, beyond.monthly_cost);
        assert_eq!(beyond.index_year, Some(2030));
    }

    #[test]
    fn unknown_keys_and_empty_index_are_neutral() {
        let est = expected_monthly_food_cost_for_year(
            &inputs(2031, "weekly-ish", "Corner shop", 60.0),
            &CpiIndex::default(),
        );
        assert!(est.eat_out_factor.is_fallback());
        assert!(est.store_tier.is_fallback());
        assert_eq!(est.index_year, None);
        assert_eq!(est.monthly_cost, round_cents(60.0 * 52.0 / 12.0));
    }

    #[test]
    fn negative_budget_counts_as_zero() {
        let index = CpiIndex::constant_growth(BASE_YEAR, 2030, 0.03);
        let est = expected_monthly_food_cost_for_year(&inputs(2027, "1-2x", "Maxi", -40.0), &index);
        assert_eq!(est.monthly_cost, 0.0);
    }

    #[test]
    fn accented_and_dashed_keys_resolve() {
        assert_eq!(store_tier("supermarché p.a."), Factor::Known(1.00));
        assert_eq!(eat_out_factor("1\u{2013}2x"), Factor::Known(1.05));
    }

    #[test]
    fn lowercase_store_names_use_their_tier() {
        assert_eq!(store_tier("metro"), Factor::Known(1.02));
        assert_eq!(store_tier("super_c"), Factor::Known(0.95));
        assert_eq!(eat_out_factor("Daily"), Factor::Known(1.20));
        assert!(store_tier("supermarche p.a.").is_fallback());
        assert!(store_tier("other").is_fallback());
        assert!(eat_out_factor("1 - 2x").is_fallback());
    }
}
