//! Command-line parsing for the food CPI pipeline.
//!
//! Argument parsing and command dispatch stay separate from the modeling code;
//! `app` turns a parsed [`Cli`] into stage calls.

use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};

use crate::domain::ModelKind;
use crate::estimate::{DEFAULT_END_YEAR, DEFAULT_STORE, DEFAULT_WEEKLY_BUDGET};
use crate::forecast::DEFAULT_HORIZON;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cpi", version, about = "Quebec food CPI forecasting and food cost estimates")]
pub struct Cli {
    /// Directory for clean series and forecasts (overrides CPI_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for trained model artifacts (overrides CPI_MODELS_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the stores/restaurants rows from a raw export and write clean series.
    Clean {
        /// Raw CPI export (CSV with metadata lines).
        #[arg(long, value_name = "CSV")]
        raw: PathBuf,
    },
    /// Fit the linear and ARIMA(1,1,1) models on the clean series.
    Train,
    /// Forecast each category from the trained models.
    Predict(PredictArgs),
    /// clean, train and predict in one process.
    Run {
        #[command(flatten)]
        predict: PredictArgs,

        /// Raw CPI export (CSV with metadata lines).
        #[arg(long, value_name = "CSV")]
        raw: PathBuf,
    },
    /// Blend grocery and restaurant inflation for an eating-out frequency.
    Blend {
        /// never, 1-2x, 3-5x or daily (free text is bucketed).
        #[arg(long, default_value = "1\u{2013}2x")]
        eat_out: String,
    },
    /// Monthly food cost from a weekly budget, store and eating-out habit.
    Estimate(EstimateArgs),
    /// Build the year -> CPI index (2025 = 100) from a monthly CPI CSV.
    Index {
        #[arg(long, value_name = "CSV")]
        csv: PathBuf,

        /// Last year to extrapolate to.
        #[arg(long, default_value_t = DEFAULT_END_YEAR)]
        end_year: i32,
    },
    /// Monthly food cost for a target year using the CPI index.
    Cost(CostArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Months to forecast.
    #[arg(
        value_name = "MONTHS",
        default_value_t = DEFAULT_HORIZON,
        value_parser = clap::value_parser!(u32).range(1..).map(|v| v as usize)
    )]
    pub months: usize,

    /// Model used for the forecast.
    #[arg(long, value_enum, default_value_t = ModelKind::Arima)]
    pub model: ModelKind,
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    /// Weekly grocery budget (CAD).
    #[arg(long, default_value_t = DEFAULT_WEEKLY_BUDGET)]
    pub weekly: f64,

    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: String,

    /// never, 1-2x, 3-5x or daily (free text is bucketed).
    #[arg(long, default_value = "1\u{2013}2x")]
    pub eat_out: String,

    /// Questionnaire JSON; its answers replace the flags above.
    #[arg(long, value_name = "JSON")]
    pub submission: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct CostArgs {
    /// Monthly CPI CSV used to build the index.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Target year (clamped to the index range).
    #[arg(long)]
    pub year: i32,

    /// never, 1-2x, 3-5x or daily.
    #[arg(long)]
    pub eat_out: String,

    /// Store name, e.g. "Super C" or "IGA".
    #[arg(long)]
    pub store: String,

    /// Weekly grocery budget in 2025 dollars.
    #[arg(long)]
    pub weekly: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_defaults_to_twelve_arima_months() {
        let cli = Cli::try_parse_from(["cpi", "predict"]).unwrap();
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.months, 12);
                assert_eq!(args.model, ModelKind::Arima);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_horizon_is_rejected() {
        assert!(Cli::try_parse_from(["cpi", "predict", "0"]).is_err());
    }

    #[test]
    fn global_dirs_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cpi", "run", "6", "--model", "linear", "--raw", "raw.csv", "--data-dir", "d", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("d")));
        match cli.command {
            Command::Run { predict, raw } => {
                assert_eq!(predict.months, 6);
                assert_eq!(predict.model, ModelKind::Linear);
                assert_eq!(raw, PathBuf::from("raw.csv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
