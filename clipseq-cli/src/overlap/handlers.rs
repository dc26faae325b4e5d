use anyhow::{Context, Result};
use clap::ArgMatches;

use clipseq_io::write_tsv;
use clipseq_occupancy::overlap_stats;

use crate::common::{OUTPUT_ARG, chrom_sizes, load_reads, read_filter, required};

pub fn run_overlap(matches: &ArgMatches) -> Result<()> {
    let primary_path = required(matches, "primary")?;
    let reference_path = required(matches, "reference")?;
    let output = required(matches, OUTPUT_ARG)?;

    let chrom_sizes = chrom_sizes(matches)?;
    let filter = read_filter(matches)?;
    let primary = load_reads(primary_path, &filter)?;
    let reference = load_reads(reference_path, &filter)?;

    let stats = overlap_stats(&primary, &reference, &chrom_sizes)
        .context("Failed to compute library overlap")?;
    log::info!(
        "{} of {} reads overlap the reference library",
        stats.overlapping_records,
        stats.total_records
    );

    write_tsv(output, &[], &[stats]).with_context(|| format!("Failed to write {}", output))?;
    Ok(())
}
