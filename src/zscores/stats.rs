use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::common::consts::{DELIMITER, KEY_COL_NAME};
use crate::multisample::join::MultiSampleMatrix;

use super::consts::STAT_COL_NAMES;

///
/// Summary statistics and per-sample Z-scores for one repeat-unit row.
///
/// The standard deviation is the sample standard deviation (n - 1 in the
/// denominator). A row with fewer than two samples, or with no spread at
/// all, has no meaningful Z-scores; those fields are NaN and `zcount` is 0.
///
#[derive(Clone, Debug)]
pub struct RowStats {
    pub mean: f64,
    pub median: f64,
    pub sd: f64,
    pub max: u64,
    pub zmax: f64,
    pub zcount: u64,
    pub zscores: Vec<f64>,
}

pub fn row_stats(counts: &[u64]) -> RowStats {
    let n = counts.len();
    let max = counts.iter().copied().max().unwrap_or(0);

    let mean = if n == 0 {
        f64::NAN
    } else {
        counts.iter().sum::<u64>() as f64 / n as f64
    };

    let median = if n == 0 {
        f64::NAN
    } else {
        let mut sorted = counts.to_vec();
        sorted.sort_unstable();
        if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
        }
    };

    let sd = if n < 2 {
        f64::NAN
    } else {
        let sum_sq: f64 = counts
            .iter()
            .map(|&count| {
                let diff = count as f64 - mean;
                diff * diff
            })
            .sum();
        (sum_sq / (n - 1) as f64).sqrt()
    };

    let (zscores, zmax, zcount) = if sd.is_nan() || sd == 0.0 {
        (vec![f64::NAN; n], f64::NAN, 0)
    } else {
        let zscores: Vec<f64> = counts
            .iter()
            .map(|&count| (count as f64 - mean) / sd)
            .collect();
        let zmax = zscores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let zcount = zscores.iter().filter(|&&z| z > 1.0).count() as u64;
        (zscores, zmax, zcount)
    };

    RowStats {
        mean,
        median,
        sd,
        max,
        zmax,
        zcount,
        zscores,
    }
}

///
/// Per-row statistics for a whole multi-sample matrix, one entry per repeat
/// unit. Row order is whatever the producer chose: lexicographic out of
/// [`compute_zscore_table`], descending by max count out of the outlier scan.
///
pub struct ZscoreTable {
    pub(crate) samples: Vec<String>,
    pub(crate) rows: Vec<(String, RowStats)>,
}

///
/// Compute statistics for every row of the matrix. Each row is summarized
/// across its samples, never down a sample's column.
///
pub fn compute_zscore_table(matrix: &MultiSampleMatrix) -> ZscoreTable {
    let mut rows: Vec<(String, RowStats)> = Vec::with_capacity(matrix.len());
    for unit in matrix.sorted_units() {
        if let Some(counts) = matrix.get(unit) {
            rows.push((unit.clone(), row_stats(counts)));
        }
    }

    ZscoreTable {
        samples: matrix.samples().to_vec(),
        rows,
    }
}

impl ZscoreTable {
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn rows(&self) -> &[(String, RowStats)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    ///
    /// Write the table as tab-separated text in the stored row order: the
    /// six summary columns, then one Z-score per sample. NaN values are
    /// written as the literal `NaN`.
    ///
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create Z-score matrix file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        let mut header = String::from(KEY_COL_NAME);
        for name in STAT_COL_NAMES {
            header.push(DELIMITER);
            header.push_str(name);
        }
        for sample in &self.samples {
            header.push(DELIMITER);
            header.push_str(sample);
        }
        writeln!(writer, "{}", header)?;

        for (unit, stats) in &self.rows {
            let mut line = unit.clone();
            for value in [stats.mean, stats.median, stats.sd] {
                line.push(DELIMITER);
                line.push_str(&value.to_string());
            }
            line.push(DELIMITER);
            line.push_str(&stats.max.to_string());
            line.push(DELIMITER);
            line.push_str(&stats.zmax.to_string());
            line.push(DELIMITER);
            line.push_str(&stats.zcount.to_string());
            for z in &stats.zscores {
                line.push(DELIMITER);
                line.push_str(&z.to_string());
            }
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multisample::extract::SampleColumn;
    use crate::multisample::join::join_sample_columns;
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn column(sample: &str, values: &[(&str, u64)]) -> SampleColumn {
        let values: HashMap<String, u64> = values
            .iter()
            .map(|(unit, count)| (unit.to_string(), *count))
            .collect();
        SampleColumn {
            sample: sample.to_string(),
            values,
        }
    }

    #[fixture]
    fn tmp() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn test_row_stats_odd_length() {
        let stats = row_stats(&[1, 2, 3, 4, 5]);

        let expected_sd = 2.5f64.sqrt();
        assert_approx_eq!(stats.mean, 3.0);
        assert_approx_eq!(stats.median, 3.0);
        assert_approx_eq!(stats.sd, expected_sd);
        assert_eq!(stats.max, 5);
        assert_approx_eq!(stats.zmax, 2.0 / expected_sd);
        // only the 5 sits more than one standard deviation above the mean
        assert_eq!(stats.zcount, 1);
    }

    #[rstest]
    fn test_row_stats_even_length_median() {
        let stats = row_stats(&[1, 2, 3, 10]);
        assert_approx_eq!(stats.median, 2.5);
    }

    #[rstest]
    fn test_zscores_round_trip_to_counts() {
        let counts = [0, 7, 3, 12, 5];
        let stats = row_stats(&counts);

        for (index, &count) in counts.iter().enumerate() {
            let rebuilt = stats.zscores[index] * stats.sd + stats.mean;
            assert_approx_eq!(rebuilt, count as f64, 1e-9);
        }
    }

    #[rstest]
    fn test_constant_row_has_nan_zscores() {
        let stats = row_stats(&[4, 4, 4]);

        assert_approx_eq!(stats.mean, 4.0);
        assert_approx_eq!(stats.median, 4.0);
        assert_approx_eq!(stats.sd, 0.0);
        assert_eq!(stats.max, 4);
        assert_eq!(stats.zmax.is_nan(), true);
        assert_eq!(stats.zcount, 0);
        assert_eq!(stats.zscores.len(), 3);
        assert_eq!(stats.zscores.iter().all(|z| z.is_nan()), true);
    }

    #[rstest]
    fn test_single_sample_has_no_spread() {
        let stats = row_stats(&[7]);

        assert_approx_eq!(stats.mean, 7.0);
        assert_approx_eq!(stats.median, 7.0);
        assert_eq!(stats.sd.is_nan(), true);
        assert_eq!(stats.max, 7);
        assert_eq!(stats.zscores.len(), 1);
        assert_eq!(stats.zscores[0].is_nan(), true);
        assert_eq!(stats.zcount, 0);
    }

    #[rstest]
    fn test_zcount_is_strictly_above_one() {
        // mean 2, sd exactly 2, so the 4 lands at exactly Z = 1.0
        let stats = row_stats(&[0, 2, 4]);

        assert_approx_eq!(stats.sd, 2.0);
        assert_eq!(stats.zmax, 1.0);
        assert_eq!(stats.zcount, 0);
    }

    #[rstest]
    fn test_stats_run_across_samples_not_down_columns() {
        let matrix = join_sample_columns(vec![
            column("s1", &[("AT", 6)]),
            column("s2", &[("A", 30)]),
            column("s3", &[("AT", 6)]),
        ]);

        let table = compute_zscore_table(&matrix);

        let units: Vec<&str> = table.rows().iter().map(|(unit, _)| unit.as_str()).collect();
        assert_eq!(units, vec!["A", "AT"]);

        // row A is [0, 30, 0]: three values from three samples
        let (_, a_stats) = &table.rows()[0];
        assert_approx_eq!(a_stats.mean, 10.0);
        assert_approx_eq!(a_stats.median, 0.0);
        assert_eq!(a_stats.max, 30);
        assert_eq!(a_stats.zscores.len(), 3);
        // scored against this row's own spread, sqrt(300); scoring down the
        // s2 column instead would leave a lone NaN
        assert_approx_eq!(a_stats.zmax, 20.0 / 300f64.sqrt());
        assert_approx_eq!(a_stats.zscores[0], -10.0 / 300f64.sqrt());

        // row AT is [6, 0, 6]
        let (_, at_stats) = &table.rows()[1];
        assert_approx_eq!(at_stats.mean, 4.0);
        assert_approx_eq!(at_stats.median, 6.0);
        assert_eq!(at_stats.max, 6);
    }

    #[rstest]
    fn test_written_table_serializes_nan(tmp: TempDir) {
        let matrix = join_sample_columns(vec![
            column("s1", &[("A", 2)]),
            column("s2", &[("A", 2)]),
        ]);
        let table = compute_zscore_table(&matrix);

        let path = tmp.path().join("zscores.txt");
        table.write_to_file(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "repeat_unit\tMean\tMedian\tSD\tMax\tZMax\tZCount\ts1\ts2"
        );
        // constant row: SD 0, so every Z column is the NaN literal
        assert_eq!(lines[1], "A\t2\t2\t0\t2\tNaN\t0\tNaN\tNaN");
    }
}
