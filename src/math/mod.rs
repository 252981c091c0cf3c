//! Mathematical utilities: least squares and ARIMA estimation primitives.

pub mod arima;
pub mod ols;

pub use arima::*;
pub use ols::*;
