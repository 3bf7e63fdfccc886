// Matrix schema
pub const KEY_COL_NAME: &str = "repeat_unit";
pub const DELIMITER: char = '\t';

/// Number of repeat-length buckets in a TRhist histogram row.
pub const HIST_COLS: usize = 90;

/// One record in a flat chunk file: the repeat unit plus its 90 counts.
pub const CHUNK_RECORD_WIDTH: usize = HIST_COLS + 1;

// File naming conventions shared across the pipeline stages
pub const COMBINED_MATRIX_SUFFIX: &str = ".combined.histogram.matrix.txt";
pub const COMBINED_MATRIX_GZ_SUFFIX: &str = ".combined.histogram.matrix.txt.gz";

pub const GZ_FILE_EXTENSION: &str = "gz";
