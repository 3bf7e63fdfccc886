use anyhow::Result;
use clap::{arg, ArgMatches, Command};

use super::*;

pub fn make_zscores_cli() -> Command {
    Command::new(consts::ZSCORES_CMD)
        .about("Compute row-wise Z-score statistics for a multi-sample TRhist matrix and flag outlier repeat units.")
        .arg(
            arg!(--"zcount-limit" <N> "Flag rows with fewer than this many samples above one standard deviation.")
                .value_parser(clap::value_parser!(u64))
                .required(false),
        )
        .arg(
            arg!(--"max-cutoff" <N> "Flag rows whose largest count exceeds this value.")
                .value_parser(clap::value_parser!(u64))
                .required(false),
        )
        .arg(arg!([dir] "The folder holding the multi-sample matrix. Defaults to the current directory.").required(false))
}

pub mod handlers {

    use std::path::Path;

    use log::info;

    use crate::multisample::consts::MULTISAMPLE_MATRIX_FILE;
    use crate::multisample::join::MultiSampleMatrix;

    use super::*;

    pub fn score_multisample_matrix(matches: &ArgMatches) -> Result<()> {
        let default_dir = String::from(".");
        let dir = Path::new(matches.get_one::<String>("dir").unwrap_or(&default_dir));

        let thresholds = OutlierThresholds {
            zcount_limit: *matches
                .get_one::<u64>("zcount-limit")
                .unwrap_or(&consts::DEFAULT_ZCOUNT_LIMIT),
            max_cutoff: *matches
                .get_one::<u64>("max-cutoff")
                .unwrap_or(&consts::DEFAULT_MAX_CUTOFF),
        };

        let matrix_path = dir.join(MULTISAMPLE_MATRIX_FILE);
        let matrix = MultiSampleMatrix::from_file(&matrix_path)?;
        if matrix.samples().is_empty() {
            anyhow::bail!(
                "Multi-sample matrix {:?} has no sample columns to score",
                matrix_path
            );
        }

        let table = compute_zscore_table(&matrix);
        let zscores_path = dir.join(consts::ZSCORES_MATRIX_FILE);
        table.write_to_file(&zscores_path)?;
        info!(
            "Scored {} repeat units across {} samples: {:?}",
            table.len(),
            table.samples().len(),
            zscores_path
        );

        let outliers = select_outliers(&table, &thresholds);
        let outlier_path = dir.join(consts::OUTLIER_MATRIX_FILE);
        outliers.write_to_file(&outlier_path)?;
        info!(
            "Flagged {} outlier repeat units (ZCount below {}, Max above {}): {:?}",
            outliers.len(),
            thresholds.zcount_limit,
            thresholds.max_cutoff,
            outlier_path
        );

        Ok(())
    }
}
