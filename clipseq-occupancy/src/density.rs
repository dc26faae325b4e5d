use std::collections::HashSet;
use std::ops::ControlFlow;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use clipseq_core::models::{Read, Strand};
use clipseq_core::{ChromSizes, ReadQuery, ReadsCollection, Result};

use crate::map::{StrandPair, check_range, check_reads_in_range};

/// Radius of the window drawn around every reference read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DensityConfig {
    pub radius: u32,
}

impl Default for DensityConfig {
    fn default() -> Self {
        DensityConfig { radius: 50 }
    }
}

/// One position of the relative density table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DensityRow {
    pub relative_position: i64,
    pub sense: u64,
    pub antisense: u64,
    pub sense_copy_number: u64,
    pub antisense_copy_number: u64,
}

///
/// Primary-library density around reference read midpoints.
///
/// Each histogram has `2 * radius + 1` slots; slot `radius` is the reference
/// midpoint and lower slots are upstream of it on the reference read's strand.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityProfile {
    radius: u32,
    reference_records: u64,
    skipped_records: u64,
    sense: Vec<u64>,
    antisense: Vec<u64>,
    sense_copy_number: Vec<u64>,
    antisense_copy_number: Vec<u64>,
}

impl DensityProfile {
    pub fn new(radius: u32) -> Self {
        let width = 2 * radius as usize + 1;
        DensityProfile {
            radius,
            reference_records: 0,
            skipped_records: 0,
            sense: vec![0; width],
            antisense: vec![0; width],
            sense_copy_number: vec![0; width],
            antisense_copy_number: vec![0; width],
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Reference reads whose window fit on their chromosome.
    pub fn reference_records(&self) -> u64 {
        self.reference_records
    }

    /// Reference reads dropped because their window left the chromosome.
    pub fn skipped_records(&self) -> u64 {
        self.skipped_records
    }

    /// Sum two partial profiles of the same radius.
    pub fn merge(mut self, other: DensityProfile) -> DensityProfile {
        self.reference_records += other.reference_records;
        self.skipped_records += other.skipped_records;
        for (mine, theirs) in [
            (&mut self.sense, &other.sense),
            (&mut self.antisense, &other.antisense),
            (&mut self.sense_copy_number, &other.sense_copy_number),
            (&mut self.antisense_copy_number, &other.antisense_copy_number),
        ] {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        self
    }

    pub fn rows(&self) -> Vec<DensityRow> {
        (0..self.sense.len())
            .map(|i| DensityRow {
                relative_position: i as i64 - self.radius as i64,
                sense: self.sense[i],
                antisense: self.antisense[i],
                sense_copy_number: self.sense_copy_number[i],
                antisense_copy_number: self.antisense_copy_number[i],
            })
            .collect()
    }
}

fn accumulate(histogram: &mut [u64], window: &[u32], reverse: bool) {
    if reverse {
        for (slot, &v) in histogram.iter_mut().zip(window.iter().rev()) {
            *slot += v as u64;
        }
    } else {
        for (slot, &v) in histogram.iter_mut().zip(window) {
            *slot += v as u64;
        }
    }
}

/// Unweighted and copy-number weighted primary density of one chromosome.
struct ChromosomeDensity {
    reads: StrandPair<u32>,
    copies: StrandPair<u32>,
}

impl ChromosomeDensity {
    fn build<P: ReadsCollection>(primary: &P, chr: &str, size: u32) -> Result<Self> {
        let mut density = ChromosomeDensity {
            reads: StrandPair::new(chr, size),
            copies: StrandPair::new(chr, size),
        };
        primary.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
            let strand = read.strand();
            density
                .reads
                .get_mut(strand)
                .add_range(read.start(), read.stop(), 1)?;
            density
                .copies
                .get_mut(strand)
                .add_range(read.start(), read.stop(), read.copy_number)?;
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(density)
    }

    fn add_window(
        &self,
        profile: &mut DensityProfile,
        reference: &Read,
        start: u32,
        stop: u32,
    ) -> Result<()> {
        let sense = reference.strand();
        let antisense = sense.opposite();
        let reverse = sense == Strand::Reverse;

        accumulate(
            &mut profile.sense,
            self.reads.get(sense).slice(start, stop)?,
            reverse,
        );
        accumulate(
            &mut profile.antisense,
            self.reads.get(antisense).slice(start, stop)?,
            reverse,
        );
        accumulate(
            &mut profile.sense_copy_number,
            self.copies.get(sense).slice(start, stop)?,
            reverse,
        );
        accumulate(
            &mut profile.antisense_copy_number,
            self.copies.get(antisense).slice(start, stop)?,
            reverse,
        );
        Ok(())
    }
}

fn chromosome_profile<P, Q>(
    primary: &P,
    reference: &Q,
    chr: &str,
    size: u32,
    radius: u32,
    primary_present: bool,
) -> Result<DensityProfile>
where
    P: ReadsCollection,
    Q: ReadsCollection,
{
    let density = match primary_present {
        true => Some(ChromosomeDensity::build(primary, chr, size)?),
        false => None,
    };

    let mut profile = DensityProfile::new(radius);
    reference.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        check_range(chr, read.start(), read.stop(), size)?;
        let midpoint = read.midpoint();
        if midpoint < radius || midpoint as u64 + radius as u64 >= size as u64 {
            profile.skipped_records += 1;
            return Ok(ControlFlow::Continue(()));
        }

        profile.reference_records += 1;
        if let Some(density) = &density {
            density.add_window(&mut profile, read, midpoint - radius, midpoint + radius)?;
        }
        Ok(ControlFlow::Continue(()))
    })?;

    Ok(profile)
}

///
/// Density of `primary` reads around the midpoints of `reference` reads.
///
/// For every reference read the window `[midpoint - radius, midpoint + radius]`
/// of the primary density maps is added to the profile, reversed when the
/// reference read is on the minus strand, so that the profile always reads
/// 5' to 3'. "Sense" is the reference read's own strand. Windows that would
/// leave the chromosome are skipped.
///
pub fn relative_density<P, Q>(
    primary: &P,
    reference: &Q,
    chrom_sizes: &ChromSizes,
    config: &DensityConfig,
) -> Result<DensityProfile>
where
    P: ReadsCollection,
    Q: ReadsCollection,
{
    let primary_names: HashSet<String> = primary.distinct_reference_names().into_iter().collect();
    let reference_names: HashSet<String> =
        reference.distinct_reference_names().into_iter().collect();
    let mut chromosomes: Vec<&String> = reference_names.union(&primary_names).collect();
    chromosomes.sort();
    for chr in &chromosomes {
        chrom_sizes.require(chr)?;
    }

    let partials = chromosomes
        .par_iter()
        .map(|&chr| {
            let size = chrom_sizes.require(chr)?;
            if !reference_names.contains(chr) {
                check_reads_in_range(primary, chr, size)?;
                return Ok(DensityProfile::new(config.radius));
            }
            log::debug!("Computing relative density on {}", chr);
            chromosome_profile(
                primary,
                reference,
                chr,
                size,
                config.radius,
                primary_names.contains(chr),
            )
        })
        .collect::<Result<Vec<DensityProfile>>>()?;

    let profile = partials
        .into_iter()
        .fold(DensityProfile::new(config.radius), DensityProfile::merge);

    if profile.skipped_records > 0 {
        log::warn!(
            "{} reference reads were skipped: their window leaves the chromosome",
            profile.skipped_records
        );
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipseq_core::models::GenomicInterval;
    use clipseq_core::{ClipSeqError, ReadStore};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn read(start: u32, stop: u32, strand: Strand, copy_number: u32) -> Read {
        Read::new(
            GenomicInterval::new("chr1", start, stop, strand).unwrap(),
            copy_number,
        )
        .unwrap()
    }

    #[fixture]
    fn sizes() -> ChromSizes {
        ChromSizes::try_from(vec![("chr1", 1000)]).unwrap()
    }

    fn config(radius: u32) -> DensityConfig {
        DensityConfig { radius }
    }

    #[rstest]
    fn test_plus_strand_window(sizes: ChromSizes) {
        let primary = ReadStore::from_reads(vec![read(101, 102, Strand::Forward, 3)]);
        let reference = ReadStore::from_reads(vec![read(100, 100, Strand::Forward, 1)]);

        let profile = relative_density(&primary, &reference, &sizes, &config(2)).unwrap();
        let rows = profile.rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].relative_position, -2);
        assert_eq!(
            rows.iter().map(|r| r.sense).collect::<Vec<_>>(),
            vec![0, 0, 0, 1, 1]
        );
        assert_eq!(
            rows.iter().map(|r| r.sense_copy_number).collect::<Vec<_>>(),
            vec![0, 0, 0, 3, 3]
        );
        assert!(rows.iter().all(|r| r.antisense == 0));
        assert_eq!(profile.reference_records(), 1);
    }

    #[rstest]
    fn test_minus_strand_window_is_reversed(sizes: ChromSizes) {
        // downstream on the plus strand is upstream for a minus strand reference
        let primary = ReadStore::from_reads(vec![
            read(101, 102, Strand::Reverse, 1),
            read(98, 98, Strand::Forward, 2),
        ]);
        let reference = ReadStore::from_reads(vec![read(100, 100, Strand::Reverse, 1)]);

        let rows = relative_density(&primary, &reference, &sizes, &config(2))
            .unwrap()
            .rows();
        assert_eq!(
            rows.iter().map(|r| r.sense).collect::<Vec<_>>(),
            vec![1, 1, 0, 0, 0]
        );
        assert_eq!(
            rows.iter().map(|r| r.antisense_copy_number).collect::<Vec<_>>(),
            vec![0, 0, 0, 0, 2]
        );
    }

    #[rstest]
    #[case(1)]
    #[case(998)]
    fn test_windows_leaving_the_chromosome_are_skipped(sizes: ChromSizes, #[case] position: u32) {
        let primary = ReadStore::from_reads(vec![read(0, 999, Strand::Forward, 1)]);
        let reference = ReadStore::from_reads(vec![read(position, position, Strand::Forward, 1)]);

        let profile = relative_density(&primary, &reference, &sizes, &config(2)).unwrap();
        assert_eq!(profile.reference_records(), 0);
        assert_eq!(profile.skipped_records(), 1);
        assert!(profile.rows().iter().all(|r| r.sense == 0));
    }

    #[rstest]
    fn test_reference_without_primary_reads(sizes: ChromSizes) {
        let primary = ReadStore::new();
        let reference = ReadStore::from_reads(vec![
            read(100, 110, Strand::Forward, 1),
            read(200, 210, Strand::Reverse, 1),
        ]);
        let profile = relative_density(&primary, &reference, &sizes, &config(5)).unwrap();
        assert_eq!(profile.reference_records(), 2);
        assert_eq!(profile.rows().len(), 11);
    }

    #[rstest]
    #[case(vec![read(995, 1005, Strand::Forward, 1)], vec![])]
    #[case(vec![], vec![read(995, 1005, Strand::Forward, 1)])]
    #[case(vec![read(995, 1005, Strand::Forward, 1)], vec![read(100, 100, Strand::Forward, 1)])]
    #[case(vec![read(100, 100, Strand::Forward, 1)], vec![read(995, 1005, Strand::Reverse, 1)])]
    fn test_reads_past_chromosome_end_abort(
        sizes: ChromSizes,
        #[case] primary: Vec<Read>,
        #[case] reference: Vec<Read>,
    ) {
        let result = relative_density(
            &ReadStore::from_reads(primary),
            &ReadStore::from_reads(reference),
            &sizes,
            &config(2),
        );
        assert!(matches!(
            result,
            Err(ClipSeqError::OutOfRange { length: 1000, .. })
        ));
    }

    #[rstest]
    fn test_merge_sums_histograms() {
        let mut a = DensityProfile::new(1);
        a.sense[1] = 2;
        a.reference_records = 1;
        let mut b = DensityProfile::new(1);
        b.sense[1] = 3;
        b.antisense[0] = 1;
        b.reference_records = 2;

        let merged = a.clone().merge(b.clone());
        assert_eq!(merged, b.merge(a));
        assert_eq!(merged.reference_records(), 3);
        assert_eq!(merged.rows()[1].sense, 5);
        assert_eq!(merged.rows()[0].antisense, 1);
    }
}
