use clap::{Arg, Command, arg, value_parser};

use crate::common::{chrom_sizes_arg, filter_arg, output_arg};

pub const DENSITY_CMD: &str = "density";
pub const DEFAULT_OUT: &str = "density.tsv";
pub const DEFAULT_RADIUS: &str = "50";

pub fn create_density_cli() -> Command {
    Command::new(DENSITY_CMD)
        .about("Profile the reads of a library around the midpoints of another library's reads.")
        .arg(
            Arg::new("primary")
                .required(true)
                .help("BED6 file of the library whose density is profiled"),
        )
        .arg(
            Arg::new("reference")
                .required(true)
                .help("BED6 file of the library giving the window centers"),
        )
        .arg(
            arg!(--radius <RADIUS>)
                .required(false)
                .default_value(DEFAULT_RADIUS)
                .value_parser(value_parser!(u32))
                .help("Window radius around each reference read midpoint"),
        )
        .arg(chrom_sizes_arg())
        .arg(filter_arg())
        .arg(output_arg(DEFAULT_OUT))
}
