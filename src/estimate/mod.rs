//! Turning CPI forecasts and user habits into a monthly food cost.
//!
//! - `blend`: weighted grocery/restaurant inflation (never fails)
//! - `ratio`: eating-out-ratio estimator (current and next-year totals)
//! - `yearly`: CPI-index estimator for a target year
//! - `index`: year -> CPI index construction (base year = 100)
//! - `factor`: lookup tables with an explicit neutral fallback

pub mod blend;
pub mod factor;
pub mod index;
pub mod ratio;
pub mod yearly;

pub use blend::*;
pub use factor::*;
pub use index::*;
pub use ratio::*;
pub use yearly::*;

/// Round a currency amount to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Negative or non-finite weekly budgets count as zero.
pub fn sanitize_budget(weekly: f64) -> f64 {
    if weekly.is_finite() && weekly > 0.0 { weekly } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(387.968), 387.97);
        assert_eq!(round_cents(10.0), 10.0);
        assert_eq!(round_cents(0.004), 0.0);
    }

    #[test]
    fn budget_sanitizing() {
        assert_eq!(sanitize_budget(-5.0), 0.0);
        assert_eq!(sanitize_budget(f64::NAN), 0.0);
        assert_eq!(sanitize_budget(80.0), 80.0);
    }
}
