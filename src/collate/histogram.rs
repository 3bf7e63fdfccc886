use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::collate::consts::ANCHOR_REPEAT_UNIT;
use crate::common::consts::{
    CHUNK_RECORD_WIDTH, COMBINED_MATRIX_SUFFIX, DELIMITER, HIST_COLS, KEY_COL_NAME,
};
use crate::common::utils::{get_dynamic_reader, sample_list_stem};

///
/// A per-sample histogram matrix: one row per repeat unit, each row holding
/// the counts for repeat-length buckets 1 to 90.
///
#[derive(Debug)]
pub struct HistogramMatrix {
    counts: HashMap<String, Vec<u64>>,
}

impl HistogramMatrix {
    /// An otherwise empty matrix seeded with the all-zero anchor row. The
    /// anchor fixes the column schema even when every input chunk is empty.
    pub fn anchored() -> Self {
        let mut counts: HashMap<String, Vec<u64>> = HashMap::new();
        counts.insert(ANCHOR_REPEAT_UNIT.to_string(), vec![0; HIST_COLS]);
        HistogramMatrix { counts }
    }

    ///
    /// Parse one flat TRhist chunk file. The chunk is a whitespace-separated
    /// stream of records, each a repeat-unit token followed by its 90 counts;
    /// the raw TRhist emitter writes one token per line, but a record-per-line
    /// layout parses identically. A token count that does not divide into
    /// whole records, or a count field that is not a non-negative integer, is
    /// a fatal parse error. A repeat unit appearing twice in one chunk has its
    /// rows summed.
    ///
    pub fn from_chunk_file(path: &Path) -> Result<Self> {
        let mut reader = get_dynamic_reader(path)?;
        let mut raw = String::new();
        reader
            .read_to_string(&mut raw)
            .with_context(|| format!("There was an error reading chunk file: {:?}", path))?;

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.len() % CHUNK_RECORD_WIDTH != 0 {
            anyhow::bail!(
                "Malformed TRhist chunk {:?}: {} fields found, which is not a multiple of the {}-field record (repeat unit + {} counts)",
                path,
                tokens.len(),
                CHUNK_RECORD_WIDTH,
                HIST_COLS
            );
        }

        let mut counts: HashMap<String, Vec<u64>> = HashMap::new();
        for record in tokens.chunks_exact(CHUNK_RECORD_WIDTH) {
            let unit = record[0];
            let row = counts
                .entry(unit.to_string())
                .or_insert_with(|| vec![0; HIST_COLS]);

            for (bucket, field) in record[1..].iter().enumerate() {
                let count: u64 = field.parse().with_context(|| {
                    format!(
                        "Error parsing count in {:?} for repeat unit {:?}, bucket {}: {:?}. It must be a non-negative integer.",
                        path,
                        unit,
                        bucket + 1,
                        field
                    )
                })?;
                row[bucket] += count;
            }
        }

        Ok(HistogramMatrix { counts })
    }

    ///
    /// Combine two matrices element-wise over the union of their repeat
    /// units; a unit missing from either side contributes zeros. Consumes
    /// both sides and returns the combined matrix, so chunk accumulation is
    /// an explicit fold rather than in-place mutation.
    ///
    pub fn merge(mut self, other: HistogramMatrix) -> HistogramMatrix {
        for (unit, row) in other.counts {
            let acc = self
                .counts
                .entry(unit)
                .or_insert_with(|| vec![0; HIST_COLS]);
            for (total, count) in acc.iter_mut().zip(row) {
                *total += count;
            }
        }
        self
    }

    pub fn get(&self, unit: &str) -> Option<&[u64]> {
        self.counts.get(unit).map(|row| row.as_slice())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Repeat units in output order (lexicographic).
    pub fn sorted_units(&self) -> Vec<&String> {
        let mut units: Vec<&String> = self.counts.keys().collect();
        units.sort();
        units
    }

    ///
    /// Write the matrix as tab-separated text: a header row labelling the
    /// key column and buckets "1".."90", then one key-sorted row per repeat
    /// unit.
    ///
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create combined matrix: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        let mut header = String::from(KEY_COL_NAME);
        for bucket in 1..=HIST_COLS {
            header.push(DELIMITER);
            header.push_str(&bucket.to_string());
        }
        writeln!(writer, "{}", header)?;

        for unit in self.sorted_units() {
            let mut line = String::from(unit.as_str());
            for count in &self.counts[unit] {
                line.push(DELIMITER);
                line.push_str(&count.to_string());
            }
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;

        Ok(())
    }
}

///
/// Fold a sequence of per-chunk TRhist files into one combined matrix,
/// starting from the anchored seed matrix. Chunks are merged in the order
/// given; the result is independent of that order.
///
/// # Arguments:
/// - chunk_files: paths to the flat per-chunk TRhist files for one sample
///
pub fn combine_chunk_files(chunk_files: &[PathBuf]) -> Result<HistogramMatrix> {
    let pb = ProgressBar::new(chunk_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks ({eta})")?
            .progress_chars("##-"),
    );

    let matrix = chunk_files
        .iter()
        .try_fold(HistogramMatrix::anchored(), |acc, path| {
            let chunk = HistogramMatrix::from_chunk_file(path)?;
            pb.inc(1);
            Ok::<HistogramMatrix, anyhow::Error>(acc.merge(chunk))
        })?;

    pb.finish_and_clear();

    Ok(matrix)
}

/// Output path for a sample's combined matrix, named from the sample list
/// stem: `runs/batch1.samples.txt` -> `runs/batch1.combined.histogram.matrix.txt`.
pub fn combined_matrix_path(sample_list: &Path) -> PathBuf {
    let stem = sample_list_stem(sample_list);
    PathBuf::from(format!("{}{}", stem.display(), COMBINED_MATRIX_SUFFIX))
}
