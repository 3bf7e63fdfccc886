use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::common::consts::GZ_FILE_EXTENSION;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new(GZ_FILE_EXTENSION));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;

    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Read a sample list: plain text, one entry per line. Entries are either
/// chunk-file paths (collate stage) or sample identifiers (matrix stage).
/// Blank lines are skipped; trailing whitespace is stripped.
///
pub fn read_sample_list(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).with_context(|| format!("Couldn't open sample list: {:?}", path))?;
    let reader = BufReader::new(file);

    let mut entries: Vec<String> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!("There was an error reading line {} of {:?}", index + 1, path)
        })?;
        let entry = line.trim_end();
        if entry.is_empty() {
            continue;
        }
        entries.push(entry.to_string());
    }

    Ok(entries)
}

///
/// List the names of all immediate subdirectories of `dir`, sorted so that
/// downstream column order is reproducible. Used when no explicit sample
/// list is supplied to the matrix stage.
///
pub fn discover_sample_dirs(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("There was an error listing sample folders in {:?}", dir))?;

    let mut samples: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            samples.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    samples.sort();

    Ok(samples)
}

///
/// The stem of a sample list path: the file name up to its first `.`, with
/// the parent directory preserved. `runs/batch1.samples.txt` -> `runs/batch1`.
/// Combined matrix outputs are named from this stem.
///
pub fn sample_list_stem(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let stem = match name.split('.').next() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => name,
    };

    path.with_file_name(stem)
}
