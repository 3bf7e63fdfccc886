use anyhow::Result;
use clap::Command;
// go through the library crate to get the interfaces
use trhist::collate;
use trhist::multisample;
use trhist::zscores;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
    pub const BIN_NAME: &str = env!("CARGO_PKG_NAME");
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Tools for combining and summarizing tandem repeat histogram (TRhist) matrices across fastq chunks, samples, and cohorts.")
        .subcommand_required(true)
        .subcommand(collate::cli::make_collate_cli())
        .subcommand(multisample::cli::make_matrix_cli())
        .subcommand(zscores::cli::make_zscores_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        Some((collate::consts::COLLATE_CMD, matches)) => {
            collate::cli::handlers::collate_chunk_files(matches)?;
        }
        Some((multisample::consts::MATRIX_CMD, matches)) => {
            multisample::cli::handlers::join_sample_matrices(matches)?;
        }
        Some((zscores::consts::ZSCORES_CMD, matches)) => {
            zscores::cli::handlers::score_multisample_matrix(matches)?;
        }
        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
