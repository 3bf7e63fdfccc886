use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::common::consts::{DELIMITER, KEY_COL_NAME};
use crate::common::utils::get_dynamic_reader;

use super::extract::SampleColumn;

///
/// A repeat-unit by sample count matrix. Each row holds one count per sample,
/// in the same order as `samples`; units a sample never reported are filled
/// with zero.
///
pub struct MultiSampleMatrix {
    samples: Vec<String>,
    rows: HashMap<String, Vec<u64>>,
}

///
/// Outer-join per-sample columns into one matrix. Every repeat unit seen in
/// any column becomes a row; samples without that unit get a zero.
///
pub fn join_sample_columns(columns: Vec<SampleColumn>) -> MultiSampleMatrix {
    let samples: Vec<String> = columns.iter().map(|c| c.sample.clone()).collect();
    let num_samples = samples.len();

    let mut rows: HashMap<String, Vec<u64>> = HashMap::new();
    for (index, column) in columns.into_iter().enumerate() {
        for (unit, count) in column.values {
            let row = rows.entry(unit).or_insert_with(|| vec![0; num_samples]);
            row[index] = count;
        }
    }

    MultiSampleMatrix { samples, rows }
}

impl MultiSampleMatrix {
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn get(&self, unit: &str) -> Option<&Vec<u64>> {
        self.rows.get(unit)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    ///
    /// Repeat units in lexicographic order; the row order of every written
    /// matrix.
    ///
    pub fn sorted_units(&self) -> Vec<&String> {
        let mut units: Vec<&String> = self.rows.keys().collect();
        units.sort();
        units
    }

    ///
    /// A copy of this matrix restricted to repeat units matching `re`.
    ///
    pub fn filter_units(&self, re: &Regex) -> MultiSampleMatrix {
        let rows = self
            .rows
            .iter()
            .filter(|(unit, _)| re.is_match(unit))
            .map(|(unit, row)| (unit.clone(), row.clone()))
            .collect();

        MultiSampleMatrix {
            samples: self.samples.clone(),
            rows,
        }
    }

    ///
    /// Read a matrix previously written with [`MultiSampleMatrix::write_to_file`].
    /// Sample names come from the header row; every data row must carry
    /// exactly one count per sample.
    ///
    pub fn from_file(path: &Path) -> Result<MultiSampleMatrix> {
        let reader = get_dynamic_reader(path)?;
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => {
                line.with_context(|| format!("There was an error reading the header of {:?}", path))?
            }
            None => anyhow::bail!("Multi-sample matrix {:?} is empty (missing header row)", path),
        };
        let samples: Vec<String> = header
            .split(DELIMITER)
            .skip(1)
            .map(|s| s.to_string())
            .collect();

        let mut rows: HashMap<String, Vec<u64>> = HashMap::new();
        for (index, line) in lines.enumerate() {
            let line = line.with_context(|| {
                format!("There was an error reading line {} of {:?}", index + 2, path)
            })?;
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split(DELIMITER);
            let unit = fields.next().unwrap_or_default().to_string();

            let mut row: Vec<u64> = Vec::with_capacity(samples.len());
            for field in fields {
                let count = field.parse().with_context(|| {
                    format!(
                        "Error parsing count at line {} of {:?}: {:?}",
                        index + 2,
                        path,
                        field
                    )
                })?;
                row.push(count);
            }

            if row.len() != samples.len() {
                anyhow::bail!(
                    "Malformed multi-sample matrix {:?} at line {}: {} counts for {} samples",
                    path,
                    index + 2,
                    row.len(),
                    samples.len()
                );
            }

            rows.insert(unit, row);
        }

        Ok(MultiSampleMatrix { samples, rows })
    }

    ///
    /// Write the matrix as tab-separated text: a header row naming the
    /// samples, then one row per repeat unit in lexicographic order.
    ///
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create multi-sample matrix file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        let mut header = String::from(KEY_COL_NAME);
        for sample in &self.samples {
            header.push(DELIMITER);
            header.push_str(sample);
        }
        writeln!(writer, "{}", header)?;

        for unit in self.sorted_units() {
            let row = &self.rows[unit];
            let mut line = unit.clone();
            for count in row {
                line.push(DELIMITER);
                line.push_str(&count.to_string());
            }
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
        Ok(())
    }
}
