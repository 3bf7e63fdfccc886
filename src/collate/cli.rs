use anyhow::Result;
use clap::{arg, ArgMatches, Command};

use super::*;

pub fn make_collate_cli() -> Command {
    Command::new(consts::COLLATE_CMD)
        .about("Combine per-chunk TRhist files into one histogram matrix for a sample.")
        .arg(
            arg!(-s --"sample-list" <FILE> "A list of TRhist chunk files to combine, one path per line.")
                .required(true),
        )
}

pub mod handlers {

    use std::path::{Path, PathBuf};

    use log::info;

    use crate::common::utils::read_sample_list;

    use super::*;

    pub fn collate_chunk_files(matches: &ArgMatches) -> Result<()> {
        let sample_list = matches
            .get_one::<String>("sample-list")
            .expect("A path to a chunk list is required.");
        let sample_list = Path::new(sample_list);

        let chunk_files: Vec<PathBuf> = read_sample_list(sample_list)?
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let matrix = combine_chunk_files(&chunk_files)?;

        let output = combined_matrix_path(sample_list);
        matrix.write_to_file(&output)?;

        info!(
            "Combined {} chunk files into {} repeat units: {:?}",
            chunk_files.len(),
            matrix.len(),
            output
        );

        Ok(())
    }
}
