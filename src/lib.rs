//! `food-cpi` library crate.
//!
//! The binary (`cpi`) is a thin wrapper around this library so the pipeline
//! stages and estimators are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod forecast;
pub mod intake;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
