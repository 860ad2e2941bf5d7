//! cardioviz: medical examination data analysis library
//!
//! Derives cardiovascular risk indicators from examination records and builds
//! two chart artifacts: a categorical breakdown of the indicators by cardio
//! label, and a lower-triangular correlation heatmap of outlier-filtered data.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
