//! Terminal output for each subcommand.
//!
//! Formatting lives here so the pipeline and estimators stay free of printing;
//! logs go to stderr through `tracing`, reports go to stdout.

pub mod format;

use crate::app::pipeline::CategoryForecast;
use crate::domain::{CategorySeries, FittedModel, ModelArtifact};
use crate::estimate::{
    BlendedInflation, CpiIndex, RateSource, RatioEstimate, RatioInputs, YearlyEstimate, YearlyInputs,
};

pub use format::{fmt_cad, fmt_pct, table_header, truncate};

/// One line per category: observation count and date range.
pub fn format_clean_summary(series: &CategorySeries) -> String {
    let mut out = String::from("Clean series:\n");
    for s in series.iter() {
        match (s.first_date(), s.last_date()) {
            (Some(first), Some(last)) => out.push_str(&format!(
                "- {:<34} n={:<4} {first} .. {last}\n",
                s.category.label(),
                s.len()
            )),
            _ => out.push_str(&format!("- {:<34} (no observations)\n", s.category.label())),
        }
    }
    out
}

/// Fitted parameters for each trained artifact.
pub fn format_training(artifacts: &[ModelArtifact]) -> String {
    let mut out = String::from("Trained models:\n");
    for a in artifacts {
        let params = match &a.model {
            FittedModel::Linear(p) => format!("intercept={:.4} slope={:.4}", p.intercept, p.slope),
            FittedModel::Arima(p) => {
                format!("phi={:.4} theta={:.4} sigma2={:.4}", p.phi, p.theta, p.sigma2)
            }
        };
        out.push_str(&format!(
            "- {:<14} {:<12} n={:<4} last={} {params}\n",
            a.category.tag(),
            a.model.kind().display_name(),
            a.n_obs,
            a.last_date
        ));
    }
    out
}

/// Forecast table; imputed YoY values are marked with `*`.
pub fn format_forecast(forecast: &CategoryForecast) -> String {
    let mut out = format!(
        "{} ({}):\n",
        forecast.category.label(),
        forecast.kind.display_name()
    );
    out.push_str(&table_header(&[("date", 10), ("cpi", 10), ("yoy", 9)]));
    let mut any_imputed = false;
    for row in &forecast.rows {
        let mark = if row.yoy_imputed { "*" } else { "" };
        any_imputed |= row.yoy_imputed;
        out.push_str(
            format!(
                "{:<10} {:>10.2} {:>9}{mark}\n",
                row.date,
                row.value,
                fmt_pct(row.yoy_inflation)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    if any_imputed {
        out.push_str("* YoY filled in (history shorter than 12 months before this point)\n");
    }
    out
}

/// Blended rate plus where each input came from.
pub fn format_blend(blended: &BlendedInflation) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Blended food CPI: {} (eating-out ratio {:.2})\n",
        fmt_pct(blended.rate),
        blended.eat_out_ratio
    ));
    for r in [&blended.grocery, &blended.restaurant] {
        let source = match &r.source {
            RateSource::Forecast { path: Some(p) } => p.display().to_string(),
            RateSource::Forecast { path: None } => "forecast".to_string(),
            RateSource::Default { .. } => "default".to_string(),
        };
        out.push_str(&format!(
            "- {:<34} {:>7} ({source})\n",
            r.category.label(),
            fmt_pct(r.rate)
        ));
    }
    out
}

pub fn format_ratio_estimate(inputs: &RatioInputs, est: &RatioEstimate) -> String {
    let store_note = if est.store_factor.is_fallback() { " (unknown store, neutral)" } else { "" };
    let mut out = String::new();
    out.push_str(&format!(
        "Weekly budget: {} | store: {}{store_note} | eating out: {}\n",
        fmt_cad(inputs.weekly_budget),
        inputs.store,
        inputs.eat_out.label()
    ));
    out.push_str(&format!("Expected monthly food cost: {}\n", fmt_cad(est.monthly_cost)));
    out.push_str(&format!(
        "Next year at {} food CPI: {}\n",
        fmt_pct(est.inflation.rate),
        fmt_cad(est.next_year_cost)
    ));
    out
}

pub fn format_index(index: &CpiIndex) -> String {
    let mut out = table_header(&[("year", 6), ("index", 8)]);
    for (year, value) in index.iter() {
        out.push_str(&format!("{year:<6} {value:>8.2}\n"));
    }
    out
}

pub fn format_yearly_estimate(inputs: &YearlyInputs, est: &YearlyEstimate) -> String {
    let mut out = String::new();
    let index_year = match est.index_year {
        Some(y) if y != inputs.year => format!(" (index clamped to {y})"),
        Some(_) => String::new(),
        None => " (no index, base-year dollars)".to_string(),
    };
    out.push_str(&format!(
        "Year {}{index_year} | CPI multiplier {:.4}\n",
        inputs.year, est.cpi_multiplier
    ));
    out.push_str(&format!(
        "Eating out: {} x{:.2} | store: {} x{:.2}\n",
        inputs.eat_out,
        est.eat_out_factor.value(),
        truncate(&inputs.store, 24),
        est.store_tier.value()
    ));
    out.push_str(&format!("Expected monthly food cost: {}\n", fmt_cad(est.monthly_cost)));
    out
}
