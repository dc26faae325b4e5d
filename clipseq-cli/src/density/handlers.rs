use anyhow::{Context, Result};
use clap::ArgMatches;

use clipseq_io::write_tsv;
use clipseq_occupancy::{DensityConfig, relative_density};

use crate::common::{OUTPUT_ARG, chrom_sizes, load_reads, read_filter, required};

pub fn run_density(matches: &ArgMatches) -> Result<()> {
    let primary_path = required(matches, "primary")?;
    let reference_path = required(matches, "reference")?;
    let output = required(matches, OUTPUT_ARG)?;
    let config = DensityConfig {
        radius: matches
            .get_one::<u32>("radius")
            .copied()
            .unwrap_or(DensityConfig::default().radius),
    };

    let chrom_sizes = chrom_sizes(matches)?;
    let filter = read_filter(matches)?;
    let primary = load_reads(primary_path, &filter)?;
    let reference = load_reads(reference_path, &filter)?;

    let profile = relative_density(&primary, &reference, &chrom_sizes, &config)
        .context("Failed to compute relative density")?;
    log::info!(
        "{} reference reads used, {} skipped at chromosome ends",
        profile.reference_records(),
        profile.skipped_records()
    );

    let preamble = [
        ("radius", profile.radius().to_string()),
        ("reference_records", profile.reference_records().to_string()),
    ];
    write_tsv(output, &preamble, &profile.rows())
        .with_context(|| format!("Failed to write {}", output))?;
    Ok(())
}
