//! # Multi-sample matrix builder
//!
//! Pulls one repeat-length bucket out of every sample's combined histogram
//! matrix and outer-joins the columns into a single repeat-unit by sample
//! matrix, plus a companion matrix restricted to repeat units of length
//! seven or less.
pub mod cli;
pub mod extract;
pub mod join;

pub mod consts {
    use crate::common::consts::HIST_COLS;

    pub const MATRIX_CMD: &str = "matrix";

    /// The longest-repeat bucket; the column the downstream outlier scan cares about.
    pub const DEFAULT_TARGET_COLUMN: usize = HIST_COLS;

    pub const MULTISAMPLE_MATRIX_FILE: &str = "multisampleTRhistMatrix.txt";
    pub const UPTO7MERS_MATRIX_FILE: &str = "upto7mers.multisampleTRhistMatrix.txt";

    /// Whole-string match for repeat units up to seven characters long.
    pub const UPTO7MERS_PATTERN: &str = r"^\w{0,7}$";
}

// Re-exports
pub use extract::*;
pub use join::*;
