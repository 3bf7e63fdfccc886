//! # Z-score statistics and outlier scan
//!
//! Summarizes each row of the multi-sample matrix across its samples
//! (mean, median, sample standard deviation, max) together with per-sample
//! Z-scores, then flags the rows whose shape suggests a repeat expansion
//! in a small slice of the cohort.
pub mod cli;
pub mod consts;
pub mod outliers;
pub mod stats;

pub use outliers::*;
pub use stats::*;
