use std::collections::HashSet;
use std::ops::ControlFlow;

use rayon::prelude::*;
use serde::Serialize;

use clipseq_core::{ChromSizes, ReadQuery, ReadsCollection, Result};

use crate::map::CoverageMap;

/// Name of the genome-wide row appended after the per-chromosome rows.
pub const TOTAL_ROW_NAME: &str = "total";

/// Covered bases of one chromosome (or of the whole genome).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub rname: String,
    pub size: u64,
    pub covered_area: u64,
    pub percent_covered: f64,
}

impl CoverageRow {
    fn new(rname: &str, size: u64, covered_area: u64) -> Self {
        let percent_covered = if size == 0 {
            0.0
        } else {
            covered_area as f64 / size as f64 * 100.0
        };
        CoverageRow {
            rname: rname.to_string(),
            size,
            covered_area,
            percent_covered,
        }
    }
}

fn chromosome_coverage<R: ReadsCollection>(reads: &R, chr: &str, size: u32) -> Result<u64> {
    let mut map = CoverageMap::new(chr, None, size);
    reads.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        map.mark_range(read.start(), read.stop())?;
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(map.covered_positions())
}

///
/// Count the bases covered by at least one read, per chromosome.
///
/// One row per chromosome of `chrom_sizes` (in declared order) followed by a
/// `total` row. Chromosomes without reads get a zero row without a map.
///
/// # Errors
///
/// A read on a chromosome missing from `chrom_sizes`, or reaching past the
/// declared length, aborts the computation.
///
pub fn genome_coverage<R: ReadsCollection>(
    reads: &R,
    chrom_sizes: &ChromSizes,
) -> Result<Vec<CoverageRow>> {
    let with_reads: HashSet<String> = reads.distinct_reference_names().into_iter().collect();
    for chr in &with_reads {
        chrom_sizes.require(chr)?;
    }

    let chromosomes: Vec<(&str, u32)> = chrom_sizes.iter().collect();
    let mut rows = chromosomes
        .par_iter()
        .map(|&(chr, size)| {
            let covered = if with_reads.contains(chr) {
                log::debug!("Computing coverage of {}", chr);
                chromosome_coverage(reads, chr, size)?
            } else {
                0
            };
            Ok(CoverageRow::new(chr, size as u64, covered))
        })
        .collect::<Result<Vec<CoverageRow>>>()?;

    let covered: u64 = rows.iter().map(|r| r.covered_area).sum();
    rows.push(CoverageRow::new(
        TOTAL_ROW_NAME,
        chrom_sizes.genome_size(),
        covered,
    ));

    Ok(rows)
}
