//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - parses CLI arguments and sets up logging
//! - resolves the artifact directories
//! - dispatches to the pipeline stages or the estimators
//! - prints reports to stdout

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Cli, Command, CostArgs, EstimateArgs};
use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::estimate::{
    CpiIndex, DEFAULT_END_YEAR, DEFAULT_FALLBACK_CAGR, EatOutFrequency, RatioInputs, YearlyInputs,
    blended_food_cpi, estimate_monthly_food_cost, expected_monthly_food_cost_for_year,
};
use crate::intake::{LastSubmission, Submission};
use crate::report;

pub mod pipeline;

/// Entry point for the `cpi` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig::from_env()
        .with_overrides(cli.data_dir.as_deref(), cli.models_dir.as_deref());
    debug!(
        data_dir = %config.data_dir.display(),
        models_dir = %config.models_dir.display(),
        "resolved configuration"
    );

    match cli.command {
        Command::Clean { raw } => {
            let series = pipeline::clean_stage(&config, &raw)?;
            print!("{}", report::format_clean_summary(&series));
        }
        Command::Train => {
            let series = pipeline::load_series(&config)?;
            let artifacts = pipeline::train_stage(&config, &series)?;
            print!("{}", report::format_training(&artifacts));
        }
        Command::Predict(args) => {
            let series = pipeline::load_series(&config)?;
            for fc in pipeline::predict_stage(&config, &series, args.model, args.months)? {
                println!("{}", report::format_forecast(&fc));
            }
        }
        Command::Run { predict, raw } => {
            let out = pipeline::run_all(&config, &raw, predict.model, predict.months)?;
            println!("{}", report::format_clean_summary(&out.series));
            println!("{}", report::format_training(&out.artifacts));
            for fc in &out.forecasts {
                println!("{}", report::format_forecast(fc));
            }
        }
        Command::Blend { eat_out } => {
            let ratio = EatOutFrequency::from_text(&eat_out).ratio();
            print!("{}", report::format_blend(&blended_food_cpi(&config, ratio)));
        }
        Command::Estimate(args) => handle_estimate(&config, args)?,
        Command::Index { csv, end_year } => {
            let index = CpiIndex::from_csv(&csv, end_year, DEFAULT_FALLBACK_CAGR)?;
            print!("{}", report::format_index(&index));
        }
        Command::Cost(args) => handle_cost(args)?,
    }
    Ok(())
}

/// Priority: RUST_LOG > --verbose > info. Logs go to stderr.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .init();
}

fn handle_estimate(config: &PipelineConfig, args: EstimateArgs) -> Result<(), AppError> {
    let inputs = match &args.submission {
        Some(path) => {
            let store = LastSubmission::new();
            let response = store.record(Submission::from_path(path)?);
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::io(format!("Failed to serialize intake response: {e}")))?;
            println!("{json}");
            store.latest_cost_inputs()
        }
        None => RatioInputs {
            weekly_budget: args.weekly,
            store: args.store,
            eat_out: EatOutFrequency::from_text(&args.eat_out),
        },
    };
    let estimate = estimate_monthly_food_cost(&inputs, config);
    print!("{}", report::format_ratio_estimate(&inputs, &estimate));
    Ok(())
}

fn handle_cost(args: CostArgs) -> Result<(), AppError> {
    let index = CpiIndex::from_csv(&args.csv, DEFAULT_END_YEAR, DEFAULT_FALLBACK_CAGR)?;
    let inputs = YearlyInputs {
        year: args.year,
        eat_out: args.eat_out,
        store: args.store,
        weekly_budget: args.weekly,
    };
    let estimate = expected_monthly_food_cost_for_year(&inputs, &index);
    print!("{}", report::format_yearly_estimate(&inputs, &estimate));
    Ok(())
}
