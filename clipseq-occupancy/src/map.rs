use std::ops::{ControlFlow, Range};

use num_traits::{PrimInt, Unsigned, identities::one, identities::zero};

use clipseq_core::models::Strand;
use clipseq_core::{ClipSeqError, ReadQuery, ReadsCollection, Result};

/// Counter type stored at each position of an [`OccupancyMap`].
pub trait Counter: PrimInt + Unsigned + Send + Sync + Into<u64> {}

impl<T> Counter for T where T: PrimInt + Unsigned + Send + Sync + Into<u64> {}

/// Byte counters: enough for "is this base covered" questions.
pub type CoverageMap = OccupancyMap<u8>;

/// Wide counters for copy-number weighted sums that can exceed 255.
pub type DensityMap = OccupancyMap<u32>;

///
/// A dense array over a whole chromosome (optionally one strand of it).
///
/// All positions are 0-based; ranges are closed. Fills and queries work on
/// slices, never through per-base calls.
///
#[derive(Debug, Clone)]
pub struct OccupancyMap<T: Counter> {
    chr: String,
    strand: Option<Strand>,
    counts: Vec<T>,
}

impl<T: Counter> OccupancyMap<T> {
    /// Zero-filled map of `length` positions.
    pub fn new(chr: &str, strand: Option<Strand>, length: u32) -> Self {
        OccupancyMap {
            chr: chr.to_string(),
            strand,
            counts: vec![zero::<T>(); length as usize],
        }
    }

    pub fn chr(&self) -> &str {
        &self.chr
    }

    pub fn strand(&self) -> Option<Strand> {
        self.strand
    }

    pub fn len(&self) -> u32 {
        self.counts.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[inline]
    fn range(&self, start: u32, stop: u32) -> Result<Range<usize>> {
        if start > stop || stop as usize >= self.counts.len() {
            return Err(ClipSeqError::OutOfRange {
                chr: self.chr.clone(),
                start,
                stop,
                length: self.len(),
            });
        }
        Ok(start as usize..stop as usize + 1)
    }

    /// Set every position of `[start, stop]` to 1.
    pub fn mark_range(&mut self, start: u32, stop: u32) -> Result<()> {
        let range = self.range(start, stop)?;
        self.counts[range].fill(one::<T>());
        Ok(())
    }

    /// Add `weight` to every position of `[start, stop]`, saturating at the
    /// counter's maximum.
    pub fn add_range(&mut self, start: u32, stop: u32, weight: T) -> Result<()> {
        let range = self.range(start, stop)?;
        for count in &mut self.counts[range] {
            *count = count.checked_add(&weight).unwrap_or_else(T::max_value);
        }
        Ok(())
    }

    /// Sum of `[start, stop]`.
    pub fn sum_range(&self, start: u32, stop: u32) -> Result<u64> {
        let range = self.range(start, stop)?;
        Ok(self.counts[range].iter().map(|&c| -> u64 { c.into() }).sum())
    }

    /// True if any position of `[start, stop]` is nonzero.
    pub fn any_in_range(&self, start: u32, stop: u32) -> Result<bool> {
        let range = self.range(start, stop)?;
        Ok(self.counts[range].iter().any(|c| !c.is_zero()))
    }

    /// Borrow the counters of `[start, stop]`.
    pub fn slice(&self, start: u32, stop: u32) -> Result<&[T]> {
        let range = self.range(start, stop)?;
        Ok(&self.counts[range])
    }

    /// Number of nonzero positions.
    pub fn covered_positions(&self) -> u64 {
        self.counts.iter().filter(|c| !c.is_zero()).count() as u64
    }
}

/// Fail unless `[start, stop]` lies on a chromosome of `length` bases.
pub fn check_range(chr: &str, start: u32, stop: u32, length: u32) -> Result<()> {
    if stop >= length {
        return Err(ClipSeqError::OutOfRange {
            chr: chr.to_string(),
            start,
            stop,
            length,
        });
    }
    Ok(())
}

///
/// Walk the reads of `chr` without building a map, failing on the first
/// one that runs past `length`.
///
/// Used for chromosomes only one library has reads on.
///
pub fn check_reads_in_range<R: ReadsCollection>(reads: &R, chr: &str, length: u32) -> Result<()> {
    reads.for_each_read_on(&ReadQuery::chromosome(chr), |read| {
        check_range(chr, read.start(), read.stop(), length)?;
        Ok(ControlFlow::Continue(()))
    })
}

/// One map per strand of a chromosome.
#[derive(Debug, Clone)]
pub struct StrandPair<T: Counter> {
    pub plus: OccupancyMap<T>,
    pub minus: OccupancyMap<T>,
}

impl<T: Counter> StrandPair<T> {
    pub fn new(chr: &str, length: u32) -> Self {
        StrandPair {
            plus: OccupancyMap::new(chr, Some(Strand::Forward), length),
            minus: OccupancyMap::new(chr, Some(Strand::Reverse), length),
        }
    }

    pub fn get(&self, strand: Strand) -> &OccupancyMap<T> {
        match strand {
            Strand::Forward => &self.plus,
            Strand::Reverse => &self.minus,
        }
    }

    pub fn get_mut(&mut self, strand: Strand) -> &mut OccupancyMap<T> {
        match strand {
            Strand::Forward => &mut self.plus,
            Strand::Reverse => &mut self.minus,
        }
    }
}
