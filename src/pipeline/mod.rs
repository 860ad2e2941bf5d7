//! Pipeline module - feature derivation, aggregation, filtering and correlation

pub mod categorical;
pub mod cohort;
pub mod correlation;
pub mod error;
pub mod features;
pub mod loader;
pub mod outliers;
pub mod schema;

pub use categorical::*;
pub use cohort::*;
pub use correlation::*;
pub use error::{PipelineError, Result};
pub use features::*;
pub use loader::*;
pub use outliers::*;
