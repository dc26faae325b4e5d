mod common;
mod coverage;
mod density;
mod overlap;

use anyhow::{Context, Result};
use clap::{ArgAction, Command, arg, value_parser};
use log::Level;
use simple_logger::init_with_level;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "clipseq";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Positional statistics for CLIP-Seq libraries: coverage, library overlap and relative read density.")
        .subcommand_required(true)
        .arg(
            arg!(--verbose)
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug messages"),
        )
        .arg(
            arg!(--threads <THREADS>)
                .global(true)
                .required(false)
                .value_parser(value_parser!(usize))
                .help("Number of worker threads (default: all cores)"),
        )
        .subcommand(coverage::cli::create_coverage_cli())
        .subcommand(overlap::cli::create_overlap_cli())
        .subcommand(density::cli::create_density_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let level = match matches.get_flag("verbose") {
        true => Level::Debug,
        false => Level::Info,
    };
    init_with_level(level).context("Failed to initialize logging")?;

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let start = std::time::Instant::now();

    match matches.subcommand() {
        //
        // COVERAGE
        //
        Some((coverage::cli::COVERAGE_CMD, matches)) => {
            coverage::handlers::run_coverage(matches)?;
        }

        //
        // OVERLAP
        //
        Some((overlap::cli::OVERLAP_CMD, matches)) => {
            overlap::handlers::run_overlap(matches)?;
        }

        //
        // RELATIVE DENSITY
        //
        Some((density::cli::DENSITY_CMD, matches)) => {
            density::handlers::run_density(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    log::info!("Elapsed time: {:?}", start.elapsed());
    Ok(())
}
