//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - CPI categories and the cleaned monthly series (`CpiCategory`, `CleanSeries`)
//! - fitted model state and its persisted artifact (`FittedModel`, `ModelArtifact`)
//! - forecast output rows (`ForecastRow`)
//! - month-end calendar helpers (`calendar`)

pub mod calendar;
pub mod types;

pub use calendar::*;
pub use types::*;
