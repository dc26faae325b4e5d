use clap::{Arg, Command};

use crate::common::{chrom_sizes_arg, filter_arg, output_arg};

pub const OVERLAP_CMD: &str = "overlap";
pub const DEFAULT_OUT: &str = "overlap.tsv";

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .about("Count the reads of a library that overlap another library on the same strand.")
        .arg(
            Arg::new("primary")
                .required(true)
                .help("BED6 file of the library whose reads are counted"),
        )
        .arg(
            Arg::new("reference")
                .required(true)
                .help("BED6 file of the library providing the covered bases"),
        )
        .arg(chrom_sizes_arg())
        .arg(filter_arg())
        .arg(output_arg(DEFAULT_OUT))
}
