//! Input/output helpers.
//!
//! - raw export normalization (`normalize`)
//! - wide-to-long series building + clean CSVs (`series`)
//! - model artifact JSON read/write (`artifact`)
//! - forecast CSV read/write (`export`)

pub mod artifact;
pub mod export;
pub mod normalize;
pub mod series;

pub use artifact::*;
pub use export::*;
pub use normalize::*;
pub use series::*;
