//! Trend model fitting and native forecasting.
//!
//! Models are implemented as small, pure functions over `FittedModel` so the
//! training and forecasting stages stay generic over the model kind.

pub mod model;

pub use model::*;
