//! Positional binning of read midpoints along features.
//!
//! A [`PositionalBinner`] turns one feature into `B` copy-number weighted
//! buckets. A [`BinAccumulator`] averages buckets over the features of one
//! category, and a [`BinTable`] turns a set of accumulators into rows.

use std::ops::ControlFlow;

use fxhash::FxHashMap;
use rayon::prelude::*;
use serde::Serialize;

use clipseq_core::models::Strand;
use clipseq_core::{ReadQuery, ReadsCollection};

use crate::errors::{GenomicDistError, Result};
use crate::models::PositionalFeature;

/// Per-nucleotide averages are scaled to reads per billion mapped copies.
pub const RPKM_SCALE: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalBinner {
    bins: u32,
    margin: u32,
}

impl PositionalBinner {
    ///
    /// Binner for `bins` buckets over `reads`.
    ///
    /// The read query window around each feature is widened by half the
    /// longest read so that reads hanging over a feature end are seen.
    ///
    pub fn new<R: ReadsCollection>(reads: &R, bins: u32) -> Result<Self> {
        if bins == 0 {
            return Err(GenomicDistError::InvalidBinning(
                "bins must be at least 1".to_string(),
            ));
        }
        Ok(PositionalBinner {
            bins,
            margin: reads.longest_read_length() / 2,
        })
    }

    pub fn bins(&self) -> u32 {
        self.bins
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// `floor(bins * offset / span)`, clamped to the last bin.
    #[inline]
    pub fn bin_of(&self, offset: u32, span: u32) -> usize {
        let bin = self.bins as u64 * offset as u64 / span as u64;
        bin.min(self.bins as u64 - 1) as usize
    }

    ///
    /// Bin of an ascending offset, numbered from the feature's 5' end.
    ///
    /// The bin is taken on the genome and then mirrored on the reverse
    /// strand (`bins - 1 - bin`), so flipping a feature's strand maps bin `i`
    /// to bin `bins - 1 - i` whatever the span.
    ///
    #[inline]
    pub fn oriented_bin(&self, strand: Strand, ascending: u32, span: u32) -> usize {
        strand.orient(self.bin_of(ascending, span) as u32, self.bins) as usize
    }

    ///
    /// Copy-number weighted buckets of one feature.
    ///
    /// Only reads on the feature's strand whose midpoint the feature contains
    /// are counted. Returns `None` for a feature of span 0.
    ///
    pub fn bin_feature<R, F>(&self, reads: &R, feature: &F) -> Result<Option<Vec<u64>>>
    where
        R: ReadsCollection,
        F: PositionalFeature + ?Sized,
    {
        let span = feature.span();
        if span == 0 {
            return Ok(None);
        }

        let mut buckets = vec![0u64; self.bins as usize];
        let query = ReadQuery::chromosome(feature.chr())
            .strand(feature.strand())
            .window(
                feature.start().saturating_sub(self.margin),
                feature.stop().saturating_add(self.margin),
            );

        reads.for_each_read_on(&query, |read| {
            if let Some(offset) = feature.ascending_position(read.midpoint()) {
                buckets[self.oriented_bin(feature.strand(), offset, span)] +=
                    read.copy_number as u64;
            }
            Ok(ControlFlow::Continue(()))
        })?;

        Ok(Some(buckets))
    }

    ///
    /// Bin every feature of one category and average the buckets.
    ///
    /// Features with a span below `min_length` (or a span of 0) are left
    /// out of both the sums and the feature count. Features are processed per
    /// chromosome on the rayon pool.
    ///
    pub fn bin_category<R, F>(
        &self,
        reads: &R,
        category: &str,
        features: &[F],
        min_length: u32,
    ) -> Result<BinAccumulator>
    where
        R: ReadsCollection,
        F: PositionalFeature + Sync,
    {
        let mut by_chr: FxHashMap<&str, Vec<&F>> = FxHashMap::default();
        let mut excluded: u64 = 0;
        for feature in features {
            let span = feature.span();
            if span == 0 || span < min_length {
                excluded += 1;
                continue;
            }
            by_chr.entry(feature.chr()).or_default().push(feature);
        }
        let by_chr: Vec<(&str, Vec<&F>)> = by_chr.into_iter().collect();

        let partials = by_chr
            .par_iter()
            .map(|(chr, features)| {
                log::debug!("Binning {} {} features on {}", features.len(), category, chr);
                let mut acc = BinAccumulator::new(category, self.bins);
                for feature in features {
                    if let Some(buckets) = self.bin_feature(reads, *feature)? {
                        acc.add_feature(&buckets, feature.span());
                    }
                }
                Ok(acc)
            })
            .collect::<Result<Vec<BinAccumulator>>>()?;

        let mut acc = partials
            .into_iter()
            .fold(BinAccumulator::new(category, self.bins), BinAccumulator::merge);
        acc.features_excluded += excluded;

        if acc.features_counted == 0 {
            log::warn!("No {} feature qualified for binning", category);
        }

        Ok(acc)
    }
}

///
/// Running bucket sums for one category of features.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinAccumulator {
    category: String,
    /// Copy-number weighted sums over all counted features.
    sums: Vec<u64>,
    /// Sums of `bucket / span` over all counted features.
    per_nucleotide: Vec<f64>,
    features_counted: u64,
    features_excluded: u64,
}

impl BinAccumulator {
    pub fn new(category: &str, bins: u32) -> Self {
        BinAccumulator {
            category: category.to_string(),
            sums: vec![0; bins as usize],
            per_nucleotide: vec![0.0; bins as usize],
            features_counted: 0,
            features_excluded: 0,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sums(&self) -> &[u64] {
        &self.sums
    }

    pub fn features_counted(&self) -> u64 {
        self.features_counted
    }

    pub fn features_excluded(&self) -> u64 {
        self.features_excluded
    }

    /// Add the buckets of one feature of the given span.
    pub fn add_feature(&mut self, buckets: &[u64], span: u32) {
        for ((sum, per_nt), &count) in self
            .sums
            .iter_mut()
            .zip(self.per_nucleotide.iter_mut())
            .zip(buckets)
        {
            *sum += count;
            *per_nt += count as f64 / span as f64;
        }
        self.features_counted += 1;
    }

    /// Combine two partial accumulators of the same category.
    pub fn merge(mut self, other: BinAccumulator) -> BinAccumulator {
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            *a += b;
        }
        for (a, b) in self.per_nucleotide.iter_mut().zip(&other.per_nucleotide) {
            *a += b;
        }
        self.features_counted += other.features_counted;
        self.features_excluded += other.features_excluded;
        self
    }

    ///
    /// One row per bin.
    ///
    /// Averages are `None` when no feature was counted; RPKM is also `None`
    /// when `total_copy_number` is 0.
    ///
    pub fn rows(&self, total_copy_number: u64) -> Vec<BinRow> {
        let n = self.features_counted;
        self.sums
            .iter()
            .zip(&self.per_nucleotide)
            .enumerate()
            .map(|(bin, (&sum, &per_nt))| {
                let mean_per_nt = (n > 0).then(|| per_nt / n as f64);
                BinRow {
                    bin: bin as u32,
                    category: self.category.clone(),
                    features: n,
                    summed_count: sum,
                    mean_count: (n > 0).then(|| sum as f64 / n as f64),
                    count_per_nucleotide: mean_per_nt,
                    rpkm: mean_per_nt
                        .filter(|_| total_copy_number > 0)
                        .map(|v| v / total_copy_number as f64 * RPKM_SCALE),
                }
            })
            .collect()
    }
}

/// One `(bin, category)` cell of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinRow {
    pub bin: u32,
    pub category: String,
    /// Features averaged into this row.
    pub features: u64,
    pub summed_count: u64,
    pub mean_count: Option<f64>,
    pub count_per_nucleotide: Option<f64>,
    pub rpkm: Option<f64>,
}

///
/// The finished distribution: one accumulator per category, in the order
/// they were added, and the library size used for RPKM.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinTable {
    categories: Vec<BinAccumulator>,
    total_copy_number: u64,
}

impl BinTable {
    pub fn new(total_copy_number: u64) -> Self {
        BinTable {
            categories: vec![],
            total_copy_number,
        }
    }

    pub fn push(&mut self, accumulator: BinAccumulator) {
        self.categories.push(accumulator);
    }

    pub fn categories(&self) -> &[BinAccumulator] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&BinAccumulator> {
        self.categories.iter().find(|c| c.category == name)
    }

    pub fn total_copy_number(&self) -> u64 {
        self.total_copy_number
    }

    pub fn rows(&self) -> Vec<BinRow> {
        self.categories
            .iter()
            .flat_map(|c| c.rows(self.total_copy_number))
            .collect()
    }
}
