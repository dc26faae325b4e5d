use std::collections::HashSet;
use std::ops::{Add, ControlFlow};

use rayon::prelude::*;
use serde::Serialize;

use clipseq_core::{ChromSizes, ReadQuery, ReadsCollection, Result};

use crate::map::{StrandPair, check_range, check_reads_in_range};

///
/// How many reads of a primary library fall on bases covered by a reference
/// library, on the same strand.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverlapStats {
    pub total_records: u64,
    pub overlapping_records: u64,
    pub total_copy_number: u64,
    pub overlapping_copy_number: u64,
}

impl OverlapStats {
    /// Combine the partial counts of two chromosomes.
    pub fn merge(self, other: OverlapStats) -> OverlapStats {
        OverlapStats {
            total_records: self.total_records + other.total_records,
            overlapping_records: self.overlapping_records + other.overlapping_records,
            total_copy_number: self.total_copy_number + other.total_copy_number,
            overlapping_copy_number: self.overlapping_copy_number
                + other.overlapping_copy_number,
        }
    }

    fn record(&mut self, copy_number: u32, overlapping: bool) {
        self.total_records += 1;
        self.total_copy_number += copy_number as u64;
        if overlapping {
            self.overlapping_records += 1;
            self.overlapping_copy_number += copy_number as u64;
        }
    }

    /// `None` when the primary library is empty.
    pub fn percent_overlapping_records(&self) -> Option<f64> {
        percent(self.overlapping_records, self.total_records)
    }

    /// `None` when the primary library is empty.
    pub fn percent_overlapping_copy_number(&self) -> Option<f64> {
        percent(self.overlapping_copy_number, self.total_copy_number)
    }
}

impl Add for OverlapStats {
    type Output = OverlapStats;

    fn add(self, other: OverlapStats) -> OverlapStats {
        self.merge(other)
    }
}

fn percent(part: u64, total: u64) -> Option<f64> {
    match total {
        0 => None,
        _ => Some(part as f64 / total as f64 * 100.0),
    }
}

fn chromosome_overlap<P, Q>(
    primary: &P,
    reference: &Q,
    chr: &str,
    size: u32,
) -> Result<OverlapStats>
where
    P: ReadsCollection,
    Q: ReadsCollection,
{
    let mut maps: StrandPair<u8> = StrandPair::new(chr, size);
    reference.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        let map = maps.get_mut(read.strand());
        map.mark_range(read.start(), read.stop())?;
        Ok(ControlFlow::Continue(()))
    })?;

    let mut stats = OverlapStats::default();
    primary.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        let overlapping = maps
            .get(read.strand())
            .any_in_range(read.start(), read.stop())?;
        stats.record(read.copy_number, overlapping);
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(stats)
}

fn count_only<P: ReadsCollection>(primary: &P, chr: &str, size: u32) -> Result<OverlapStats> {
    let mut stats = OverlapStats::default();
    primary.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        check_range(chr, read.start(), read.stop(), size)?;
        stats.record(read.copy_number, false);
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(stats)
}

///
/// Overlap of `primary` reads with the bases covered by `reference` reads.
///
/// A primary read overlaps when at least one base of its own range is
/// covered by a reference read on the same strand.
///
/// # Errors
///
/// Chromosomes missing from `chrom_sizes` and reads of either library past
/// the declared length of their chromosome abort the computation.
///
pub fn overlap_stats<P, Q>(
    primary: &P,
    reference: &Q,
    chrom_sizes: &ChromSizes,
) -> Result<OverlapStats>
where
    P: ReadsCollection,
    Q: ReadsCollection,
{
    let primary_names: HashSet<String> = primary.distinct_reference_names().into_iter().collect();
    let reference_names: HashSet<String> =
        reference.distinct_reference_names().into_iter().collect();
    let mut chromosomes: Vec<&String> = primary_names.union(&reference_names).collect();
    chromosomes.sort();
    for chr in &chromosomes {
        chrom_sizes.require(chr)?;
    }

    let partials = chromosomes
        .par_iter()
        .map(|&chr| {
            let size = chrom_sizes.require(chr)?;
            match (primary_names.contains(chr), reference_names.contains(chr)) {
                (true, true) => {
                    log::debug!("Computing overlap on {}", chr);
                    chromosome_overlap(primary, reference, chr, size)
                }
                (true, false) => count_only(primary, chr, size),
                (false, _) => {
                    check_reads_in_range(reference, chr, size)?;
                    Ok(OverlapStats::default())
                }
            }
        })
        .collect::<Result<Vec<OverlapStats>>>()?;

    Ok(partials
        .into_iter()
        .fold(OverlapStats::default(), OverlapStats::merge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipseq_core::models::{GenomicInterval, Read, Strand};
    use clipseq_core::{ClipSeqError, ReadStore};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn read(chr: &str, start: u32, stop: u32, strand: Strand, copy_number: u32) -> Read {
        Read::new(
            GenomicInterval::new(chr, start, stop, strand).unwrap(),
            copy_number,
        )
        .unwrap()
    }

    #[fixture]
    fn sizes() -> ChromSizes {
        ChromSizes::try_from(vec![("chr1", 1000), ("chr2", 1000)]).unwrap()
    }

    #[rstest]
    fn test_same_strand_overlap(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![read("chr1", 50, 60, Strand::Forward, 1)]);
        let reference = ReadStore::from_reads(vec![read("chr1", 55, 65, Strand::Forward, 1)]);

        let stats = overlap_stats(&primary, &reference, &sizes).unwrap();
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.overlapping_records, 1);
        assert_eq!(stats.percent_overlapping_records(), Some(100.0));
    }

    #[rstest]
    fn test_opposite_strand_does_not_overlap(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![read("chr1", 50, 60, Strand::Forward, 1)]);
        let reference = ReadStore::from_reads(vec![read("chr1", 55, 65, Strand::Reverse, 1)]);

        let stats = overlap_stats(&primary, &reference, &sizes).unwrap();
        assert_eq!(stats.total_records, 1);
        assert_eq!(stats.overlapping_records, 0);
        assert_eq!(stats.percent_overlapping_records(), Some(0.0));
    }

    #[rstest]
    fn test_copy_number_weighting_and_merge(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![
            read("chr1", 0, 9, Strand::Forward, 4),
            read("chr1", 500, 509, Strand::Reverse, 2),
            read("chr2", 100, 119, Strand::Reverse, 3),
        ]);
        let reference = ReadStore::from_reads(vec![
            read("chr1", 9, 20, Strand::Forward, 1),
            read("chr2", 110, 110, Strand::Reverse, 1),
        ]);

        let stats = overlap_stats(&primary, &reference, &sizes).unwrap();
        assert_eq!(
            stats,
            OverlapStats {
                total_records: 3,
                overlapping_records: 2,
                total_copy_number: 9,
                overlapping_copy_number: 7,
            }
        );
    }

    #[rstest]
    fn test_chromosome_without_reference_reads(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![read("chr2", 0, 9, Strand::Forward, 5)]);
        let reference = ReadStore::from_reads(vec![read("chr1", 0, 9, Strand::Forward, 1)]);

        let stats = overlap_stats(&primary, &reference, &sizes).unwrap();
        assert_eq!(stats.total_copy_number, 5);
        assert_eq!(stats.overlapping_copy_number, 0);
    }

    #[rstest]
    fn test_empty_primary_has_no_percentages(sizes: ChromSizes) {
        let stats = overlap_stats(&ReadStore::new(), &ReadStore::new(), &sizes).unwrap();
        assert_eq!(stats.percent_overlapping_records(), None);
        assert_eq!(stats.percent_overlapping_copy_number(), None);
    }

    #[rstest]
    fn test_reference_on_unknown_chromosome(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![read("chr1", 0, 9, Strand::Forward, 1)]);
        let reference = ReadStore::from_reads(vec![read("chrUn", 0, 9, Strand::Forward, 1)]);
        assert!(matches!(
            overlap_stats(&primary, &reference, &sizes),
            Err(ClipSeqError::UnknownChromosome(_))
        ));
    }

    #[rstest]
    // reference read on a chromosome without primary reads
    #[case(("chr1", 0, 9), ("chr2", 995, 1005))]
    // primary read on a chromosome without reference reads
    #[case(("chr1", 995, 1005), ("chr2", 0, 9))]
    #[case(("chr1", 995, 1005), ("chr1", 0, 9))]
    #[case(("chr1", 0, 9), ("chr1", 995, 1005))]
    fn test_reads_past_chromosome_end_abort(
        sizes: ChromSizes,
        #[case] primary: (&str, u32, u32),
        #[case] reference: (&str, u32, u32),
    ) {
        let primary = ReadStore::from_reads(vec![read(
            primary.0,
            primary.1,
            primary.2,
            Strand::Forward,
            1,
        )]);
        let reference = ReadStore::from_reads(vec![read(
            reference.0,
            reference.1,
            reference.2,
            Strand::Forward,
            1,
        )]);
        assert!(matches!(
            overlap_stats(&primary, &reference, &sizes),
            Err(ClipSeqError::OutOfRange { length: 1000, .. })
        ));
    }

    #[rstest]
    fn test_merge_is_commutative() {
        let a = OverlapStats {
            total_records: 3,
            overlapping_records: 1,
            total_copy_number: 8,
            overlapping_copy_number: 2,
        };
        let b = OverlapStats {
            total_records: 1,
            overlapping_records: 1,
            total_copy_number: 1,
            overlapping_copy_number: 1,
        };
        assert_eq!(a + b, b + a);
        assert_eq!(a.merge(OverlapStats::default()), a);
    }
}
