//! Eating-out-ratio food cost estimator.
//!
//! ```text
//! base    = weekly * store_multiplier * 4.33
//! monthly = base * (1 + eat_out_ratio * (1.6 - 1))
//! ```
//!
//! `4.33` weeks per month is a fixed constant (not 52/12). The estimate also
//! carries a next-year total inflated by the blended food CPI; `monthly_cost`
//! stays the current-year figure.

use crate::config::PipelineConfig;
use crate::estimate::blend::{BlendedInflation, blended_food_cpi};
use crate::estimate::factor::{Factor, lookup};
use crate::estimate::{round_cents, sanitize_budget};

pub const WEEKS_PER_MONTH: f64 = 4.33;

/// Restaurant spending relative to home cooking.
pub const RESTAURANT_PREMIUM: f64 = 1.6;

pub const DEFAULT_WEEKLY_BUDGET: f64 = 80.0;
pub const DEFAULT_STORE: &str = "other";

pub const STORE_MULTIPLIERS: [(&str, f64); 7] = [
    ("costco", 0.95),
    ("walmart", 0.98),
    ("super_c", 0.97),
    ("iga", 1.05),
    ("metro", 1.05),
    ("provigo", 1.08),
    ("other", 1.00),
];

/// Eating-out frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EatOutFrequency {
    Never,
    #[default]
    OnceOrTwiceWeekly,
    ThreeToFiveWeekly,
    Daily,
}

impl EatOutFrequency {
    /// Bucket free-form text: `never` / `daily` by substring, any `3` or `5`
    /// means 3–5x, everything else is 1–2x.
    pub fn from_text(text: &str) -> Self {
        let t = text.to_lowercase();
        if t.contains("never") {
            EatOutFrequency::Never
        } else if t.contains("daily") {
            EatOutFrequency::Daily
        } else if t.contains('3') || t.contains('5') {
            EatOutFrequency::ThreeToFiveWeekly
        } else {
            EatOutFrequency::OnceOrTwiceWeekly
        }
    }

    /// Share of food spending that happens at restaurants.
    pub fn ratio(self) -> f64 {
        match self {
            EatOutFrequency::Never => 0.0,
            EatOutFrequency::OnceOrTwiceWeekly => 0.2,
            EatOutFrequency::ThreeToFiveWeekly => 0.5,
            EatOutFrequency::Daily => 0.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EatOutFrequency::Never => "never",
            EatOutFrequency::OnceOrTwiceWeekly => "1\u{2013}2x",
            EatOutFrequency::ThreeToFiveWeekly => "3\u{2013}5x",
            EatOutFrequency::Daily => "daily",
        }
    }
}

/// Inputs for one ratio-based estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioInputs {
    pub weekly_budget: f64,
    pub store: String,
    pub eat_out: EatOutFrequency,
}

impl Default for RatioInputs {
    fn default() -> Self {
        Self {
            weekly_budget: DEFAULT_WEEKLY_BUDGET,
            store: DEFAULT_STORE.to_string(),
            eat_out: EatOutFrequency::default(),
        }
    }
}

/// Result of a ratio-based estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioEstimate {
    /// Current-year monthly cost (CAD, rounded to cents).
    pub monthly_cost: f64,
    /// Monthly cost inflated by one year of blended food CPI.
    pub next_year_cost: f64,
    pub eat_out_ratio: f64,
    pub store_factor: Factor,
    pub inflation: BlendedInflation,
}

/// Store multiplier, neutral for unknown stores.
pub fn store_multiplier(store: &str) -> Factor {
    lookup(&STORE_MULTIPLIERS, store, "store_multiplier")
}

/// Current-year monthly cost, unrounded.
fn current_total(inputs: &RatioInputs) -> f64 {
    let base = sanitize_budget(inputs.weekly_budget) * store_multiplier(&inputs.store).value() * WEEKS_PER_MONTH;
    let eat_out = base * inputs.eat_out.ratio() * (RESTAURANT_PREMIUM - 1.0);
    base + eat_out
}

/// Current-year monthly cost, rounded to cents. No CPI input needed.
pub fn monthly_food_cost(inputs: &RatioInputs) -> f64 {
    round_cents(current_total(inputs))
}

/// Estimate with an already blended inflation figure.
pub fn estimate_with_inflation(inputs: &RatioInputs, inflation: BlendedInflation) -> RatioEstimate {
    let total_now = current_total(inputs);
    let total_next_year = total_now * (1.0 + inflation.rate);
    RatioEstimate {
        monthly_cost: round_cents(total_now),
        next_year_cost: round_cents(total_next_year),
        eat_out_ratio: inputs.eat_out.ratio(),
        store_factor: store_multiplier(&inputs.store),
        inflation,
    }
}

/// Estimate using the forecasts on disk (defaults when they are missing).
pub fn estimate_monthly_food_cost(inputs: &RatioInputs, config: &PipelineConfig) -> RatioEstimate {
    let inflation = blended_food_cpi(config, inputs.eat_out.ratio());
    estimate_with_inflation(inputs, inflation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CpiCategory;
    use crate::estimate::blend::{RateReading, blend};

    fn inputs(weekly: f64, store: &str, freq: &str) -> RatioInputs {
        RatioInputs {
            weekly_budget: weekly,
            store: store.to_string(),
            eat_out: EatOutFrequency::from_text(freq),
        }
    }

    #[test]
    fn reference_case_is_stable() {
        // 80 * 1.0 * 4.33 * (1 + 0.2 * 0.6) = 387.968
        let i = inputs(80.0, "other", "1\u{2013}2x");
        assert_eq!(monthly_food_cost(&i), 387.97);
        assert_eq!(monthly_food_cost(&i), monthly_food_cost(&i.clone()));
    }

    #[test]
    fn frequency_bucketing() {
        assert_eq!(EatOutFrequency::from_text("Never"), EatOutFrequency::Never);
        assert_eq!(EatOutFrequency::from_text("DAILY"), EatOutFrequency::Daily);
        assert_eq!(EatOutFrequency::from_text("3-5x"), EatOutFrequency::ThreeToFiveWeekly);
        assert_eq!(EatOutFrequency::from_text("5 times"), EatOutFrequency::ThreeToFiveWeekly);
        assert_eq!(EatOutFrequency::from_text("sometimes"), EatOutFrequency::OnceOrTwiceWeekly);
    }

    #[test]
    fn unknown_store_is_neutral() {
        let known = monthly_food_cost(&inputs(100.0, "other", "never"));
        let unknown = monthly_food_cost(&inputs(100.0, "Epicerie du coin", "never"));
        assert_eq!(known, unknown);
        assert!(store_multiplier("Epicerie du coin").is_fallback());
        assert_eq!(store_multiplier("Super C"), Factor::Known(0.97));
    }

    #[test]
    fn display_names_share_the_snake_case_multiplier() {
        for name in ["Super C", "super_c", "SUPER  C", "Costco", "METRO"] {
            assert!(!store_multiplier(name).is_fallback(), "{name}");
        }
        assert_eq!(store_multiplier("Metro"), store_multiplier("metro"));
        // Punctuation and spelling still matter.
        assert!(store_multiplier("superc").is_fallback());
        assert!(store_multiplier("Super-C").is_fallback());
        assert!(store_multiplier("Maxi").is_fallback());
    }

    #[test]
    fn next_year_total_is_inflated_but_not_primary() {
        let inflation = blend(
            RateReading::default_for(CpiCategory::Stores, "test"),
            RateReading::default_for(CpiCategory::Restaurants, "test"),
            0.0,
        );
        let est = estimate_with_inflation(&inputs(100.0, "costco", "never"), inflation);
        // 100 * 0.95 * 4.33 = 411.35
        assert_eq!(est.monthly_cost, 411.35);
        assert_eq!(est.next_year_cost, round_cents(411.35 * 1.04));
        assert_eq!(est.eat_out_ratio, 0.0);
    }
}
