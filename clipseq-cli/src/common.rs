//! Inputs shared by every subcommand.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, arg};
use indicatif::{ProgressBar, ProgressStyle};

use clipseq_core::ChromSizes;
use clipseq_core::ReadStore;
use clipseq_core::config::ReadFilterConfig;
use clipseq_core::filter::ReadFilter;
use clipseq_io::read_bed6;

pub const CHROM_SIZES_ARG: &str = "chrom-sizes";
pub const FILTER_ARG: &str = "filter";
pub const OUTPUT_ARG: &str = "output";

pub fn chrom_sizes_arg() -> Arg {
    Arg::new(CHROM_SIZES_ARG)
        .long(CHROM_SIZES_ARG)
        .required(true)
        .help("Path to a chrom.sizes file (name<TAB>size per line)")
}

pub fn filter_arg() -> Arg {
    arg!(--filter <FILTER>)
        .required(false)
        .help("TOML file of read filters applied while loading reads")
}

pub fn output_arg(default: &'static str) -> Arg {
    arg!(--output <OUTPUT>)
        .required(false)
        .default_value(default)
        .help("Output table (.tsv or .tsv.gz)")
}

fn spinner(msg: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(" {spinner} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar.set_message(msg);
    bar
}

/// The read filter given with `--filter`, or an empty one.
pub fn read_filter(matches: &ArgMatches) -> Result<ReadFilter> {
    match matches.get_one::<String>(FILTER_ARG) {
        Some(path) => {
            let config = ReadFilterConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to load read filter from {}", path))?;
            config
                .into_filter()
                .with_context(|| format!("Invalid read filter in {}", path))
        }
        None => Ok(ReadFilter::new()),
    }
}

pub fn chrom_sizes(matches: &ArgMatches) -> Result<ChromSizes> {
    let path = matches
        .get_one::<String>(CHROM_SIZES_ARG)
        .context("--chrom-sizes is required")?;
    ChromSizes::try_from(path.as_str())
        .with_context(|| format!("Failed to load chromosome sizes from {}", path))
}

/// Load a BED6 library behind a spinner.
pub fn load_reads(path: &str, filter: &ReadFilter) -> Result<ReadStore> {
    let bar = spinner(format!("Loading {}", path));
    let reads = read_bed6(path, filter);
    bar.finish_and_clear();

    let reads = reads.with_context(|| format!("Failed to load reads from {}", path))?;
    log::info!(
        "Loaded {} reads ({} copies) from {}",
        reads.len(),
        clipseq_core::ReadsCollection::total_copy_number(&reads),
        path
    );
    Ok(reads)
}

pub fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("<{}> is required", name))
}
