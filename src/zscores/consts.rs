pub const ZSCORES_CMD: &str = "zscores";

// File name kept as the pipeline's consumers expect it, doubled "ll" included.
pub const ZSCORES_MATRIX_FILE: &str = "Zscores.mulltisampleTRhistMatrix.txt";
pub const OUTLIER_MATRIX_FILE: &str = "outlierSamplesTRhistMatrix.txt";

/// Summary columns written ahead of the per-sample Z-scores.
pub const STAT_COL_NAMES: [&str; 6] = ["Mean", "Median", "SD", "Max", "ZMax", "ZCount"];

/// Outlier rows must have fewer than this many samples above one standard deviation.
pub const DEFAULT_ZCOUNT_LIMIT: u64 = 5;

/// Outlier rows must have a count somewhere above this value.
pub const DEFAULT_MAX_CUTOFF: u64 = 19;
