use anyhow::{Context, Result};
use clap::ArgMatches;

use clipseq_io::write_tsv;
use clipseq_occupancy::genome_coverage;

use crate::common::{OUTPUT_ARG, chrom_sizes, load_reads, read_filter, required};

pub fn run_coverage(matches: &ArgMatches) -> Result<()> {
    let reads_path = required(matches, "reads")?;
    let output = required(matches, OUTPUT_ARG)?;

    let chrom_sizes = chrom_sizes(matches)?;
    let filter = read_filter(matches)?;
    let reads = load_reads(reads_path, &filter)?;

    let rows = genome_coverage(&reads, &chrom_sizes).context("Failed to compute coverage")?;
    if let Some(total) = rows.last() {
        log::info!(
            "{} of {} bases covered ({:.4}%)",
            total.covered_area,
            total.size,
            total.percent_covered
        );
    }

    write_tsv(output, &[], &rows).with_context(|| format!("Failed to write {}", output))?;
    Ok(())
}
