use clap::{Arg, Command};

use crate::common::{chrom_sizes_arg, filter_arg, output_arg};

pub const COVERAGE_CMD: &str = "coverage";
pub const DEFAULT_OUT: &str = "coverage.tsv";

pub fn create_coverage_cli() -> Command {
    Command::new(COVERAGE_CMD)
        .about("Count the bases covered by a library, per chromosome and genome-wide.")
        .arg(
            Arg::new("reads")
                .required(true)
                .help("BED6 file of reads; the score column is the copy number"),
        )
        .arg(chrom_sizes_arg())
        .arg(filter_arg())
        .arg(output_arg(DEFAULT_OUT))
}
