use anyhow::Result;
use clap::{arg, ArgMatches, Command};

use super::*;

pub fn make_matrix_cli() -> Command {
    Command::new(consts::MATRIX_CMD)
        .about("Join one histogram column from every sample's combined matrix into a multi-sample matrix.")
        .arg(
            arg!(-s --"sample-list" <FILE> "A file listing the samples to join, one identifier per line. Defaults to every sample folder in the working directory.")
                .required(false),
        )
        .arg(
            arg!(-c --column <N> "The 1-based histogram column (repeat-length bucket) to extract.")
                .value_parser(clap::value_parser!(usize))
                .required(false),
        )
        .arg(arg!([dir] "The folder holding the per-sample folders. Defaults to the current directory.").required(false))
}

pub mod handlers {

    use std::path::Path;

    use log::info;
    use regex::Regex;

    use crate::common::utils::{discover_sample_dirs, read_sample_list};

    use super::*;

    pub fn join_sample_matrices(matches: &ArgMatches) -> Result<()> {
        let default_dir = String::from(".");
        let dir = Path::new(matches.get_one::<String>("dir").unwrap_or(&default_dir));
        let target_column = matches
            .get_one::<usize>("column")
            .unwrap_or(&consts::DEFAULT_TARGET_COLUMN);

        let samples = match matches.get_one::<String>("sample-list") {
            Some(sample_list) => read_sample_list(Path::new(sample_list))?,
            None => {
                info!(
                    "No sample list given. Using the sample folders found in {:?}.",
                    dir
                );
                discover_sample_dirs(dir)?
            }
        };
        if samples.is_empty() {
            anyhow::bail!("No samples to join: the sample set is empty");
        }

        let columns = extract_sample_columns(dir, &samples, *target_column)?;
        let matrix = join_sample_columns(columns);

        let matrix_path = dir.join(consts::MULTISAMPLE_MATRIX_FILE);
        matrix.write_to_file(&matrix_path)?;
        info!(
            "Joined column {} of {} samples over {} repeat units: {:?}",
            target_column,
            matrix.samples().len(),
            matrix.len(),
            matrix_path
        );

        let upto7mers = Regex::new(consts::UPTO7MERS_PATTERN).unwrap();
        let upto7mers_path = dir.join(consts::UPTO7MERS_MATRIX_FILE);
        let filtered = matrix.filter_units(&upto7mers);
        filtered.write_to_file(&upto7mers_path)?;
        info!(
            "Kept {} repeat units of length 7 or less: {:?}",
            filtered.len(),
            upto7mers_path
        );

        Ok(())
    }
}
