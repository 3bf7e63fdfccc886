use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::common::consts::{COMBINED_MATRIX_GZ_SUFFIX, DELIMITER, HIST_COLS};
use crate::common::utils::get_dynamic_reader;

///
/// One histogram column for one sample, keyed by repeat unit. Repeat units
/// whose count at the target column is zero are dropped at extraction time,
/// so a unit key present here always carries signal for this sample.
///
pub struct SampleColumn {
    pub sample: String,
    pub values: HashMap<String, u64>,
}

///
/// Extract the target histogram column for one sample from its combined
/// matrix, conventionally `<sample>/<sample>.combined.histogram.matrix.txt.gz`
/// under `dir`. The target column is the 1-based bucket index into the 90
/// data columns; rows with a zero count at that column are dropped.
///
pub fn extract_sample_column(
    dir: &Path,
    sample: &str,
    target_column: usize,
) -> Result<SampleColumn> {
    if target_column < 1 || target_column > HIST_COLS {
        anyhow::bail!(
            "Target column {} is out of range: histogram buckets run 1 to {}",
            target_column,
            HIST_COLS
        );
    }

    let path = dir
        .join(sample)
        .join(format!("{}{}", sample, COMBINED_MATRIX_GZ_SUFFIX));
    let reader = get_dynamic_reader(&path)
        .with_context(|| format!("Couldn't read the combined matrix for sample {:?}", sample))?;

    let mut lines = reader.lines();
    if lines.next().is_none() {
        anyhow::bail!("Combined matrix {:?} is empty (missing header row)", path);
    }

    let mut values: HashMap<String, u64> = HashMap::new();
    for (index, line) in lines.enumerate() {
        let line = line
            .with_context(|| format!("There was an error reading line {} of {:?}", index + 2, path))?;
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() <= target_column {
            anyhow::bail!(
                "Malformed combined matrix {:?} at line {}: {} columns, expected at least {}",
                path,
                index + 2,
                fields.len(),
                target_column + 1
            );
        }

        let count: u64 = fields[target_column].parse().with_context(|| {
            format!(
                "Error parsing count at line {} of {:?}: {:?}",
                index + 2,
                path,
                fields[target_column]
            )
        })?;

        if count != 0 {
            values.insert(fields[0].to_string(), count);
        }
    }

    debug!(
        "Extracted column {} for sample {}: {} non-zero repeat units",
        target_column,
        sample,
        values.len()
    );

    Ok(SampleColumn {
        sample: sample.to_string(),
        values,
    })
}

///
/// Extract the target column for every sample, in order.
///
pub fn extract_sample_columns(
    dir: &Path,
    samples: &[String],
    target_column: usize,
) -> Result<Vec<SampleColumn>> {
    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} samples ({eta})")?
            .progress_chars("##-"),
    );

    let mut columns: Vec<SampleColumn> = Vec::with_capacity(samples.len());
    for sample in samples {
        columns.push(extract_sample_column(dir, sample, target_column)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Lay down `<sample>/<sample>.combined.histogram.matrix.txt.gz` with the
    /// given (unit, bucket-90 count) rows; every other bucket gets `filler`.
    fn write_sample_matrix(dir: &Path, sample: &str, rows: &[(&str, u64)], filler: u64) {
        let sample_dir = dir.join(sample);
        fs::create_dir_all(&sample_dir).unwrap();
        let path = sample_dir.join(format!("{}{}", sample, COMBINED_MATRIX_GZ_SUFFIX));

        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());

        let mut header = String::from("repeat_unit");
        for bucket in 1..=HIST_COLS {
            header.push('\t');
            header.push_str(&bucket.to_string());
        }
        writeln!(encoder, "{}", header).unwrap();

        for (unit, last) in rows {
            let mut fields = vec![filler.to_string(); HIST_COLS];
            fields[HIST_COLS - 1] = last.to_string();
            writeln!(encoder, "{}\t{}", unit, fields.join("\t")).unwrap();
        }
        encoder.finish().unwrap();
    }

    #[fixture]
    fn tmp() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn test_extracts_target_column_and_drops_zeros(tmp: TempDir) {
        write_sample_matrix(
            tmp.path(),
            "NA12878",
            &[("A", 12), ("AT", 0), ("CCG", 3)],
            0,
        );

        let column = extract_sample_column(tmp.path(), "NA12878", 90).unwrap();

        assert_eq!(column.sample, "NA12878");
        assert_eq!(column.values.len(), 2);
        assert_eq!(column.values["A"], 12);
        assert_eq!(column.values["CCG"], 3);
        assert_eq!(column.values.contains_key("AT"), false);
    }

    #[rstest]
    fn test_extracts_leading_column(tmp: TempDir) {
        // bucket 90 is zero but bucket 1 carries the filler value
        write_sample_matrix(tmp.path(), "NA12878", &[("A", 0)], 5);

        let column = extract_sample_column(tmp.path(), "NA12878", 1).unwrap();
        assert_eq!(column.values["A"], 5);
    }

    #[rstest]
    fn test_missing_sample_matrix_is_fatal(tmp: TempDir) {
        let result = extract_sample_column(tmp.path(), "ghost", 90);
        assert_eq!(result.is_err(), true);
    }

    #[rstest]
    fn test_column_out_of_range_is_fatal(tmp: TempDir) {
        write_sample_matrix(tmp.path(), "NA12878", &[("A", 1)], 0);

        assert_eq!(extract_sample_column(tmp.path(), "NA12878", 0).is_err(), true);
        assert_eq!(
            extract_sample_column(tmp.path(), "NA12878", HIST_COLS + 1).is_err(),
            true
        );
    }

    #[rstest]
    fn test_short_row_is_fatal(tmp: TempDir) {
        let sample_dir = tmp.path().join("NA12878");
        fs::create_dir_all(&sample_dir).unwrap();
        let path = sample_dir.join(format!("NA12878{}", COMBINED_MATRIX_GZ_SUFFIX));

        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        writeln!(encoder, "repeat_unit\t1\t2").unwrap();
        writeln!(encoder, "A\t1\t2").unwrap();
        encoder.finish().unwrap();

        let result = extract_sample_column(tmp.path(), "NA12878", 90);
        assert_eq!(result.is_err(), true);
    }

    #[rstest]
    fn test_extract_all_samples_in_order(tmp: TempDir) {
        write_sample_matrix(tmp.path(), "s1", &[("A", 1)], 0);
        write_sample_matrix(tmp.path(), "s2", &[("AT", 2)], 0);

        let samples = vec!["s2".to_string(), "s1".to_string()];
        let columns = extract_sample_columns(tmp.path(), &samples, 90).unwrap();

        let order: Vec<&str> = columns.iter().map(|c| c.sample.as_str()).collect();
        assert_eq!(order, vec!["s2", "s1"]);
    }
}
