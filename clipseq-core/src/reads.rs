//! Read sources consumed by the analyses.
//!
//! Analyses never hold a whole library. They ask a [`ReadsCollection`] for the
//! reads of one chromosome (optionally one strand and one window) and receive
//! them one at a time through a callback.

use std::ops::ControlFlow;

use fxhash::FxHashMap;

use crate::errors::Result;
use crate::filter::ReadFilter;
use crate::models::{Read, Strand};
use crate::utils::chrom_karyotype_key;

/// Which reads a [`ReadsCollection`] should visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadQuery<'a> {
    pub chr: &'a str,
    pub strand: Option<Strand>,
    /// Closed range; a read is visited when any of its bases falls inside.
    pub window: Option<(u32, u32)>,
}

impl<'a> ReadQuery<'a> {
    pub fn chromosome(chr: &'a str) -> Self {
        ReadQuery {
            chr,
            strand: None,
            window: None,
        }
    }

    pub fn strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn window(mut self, start: u32, stop: u32) -> Self {
        self.window = Some((start, stop));
        self
    }

    #[inline]
    pub fn matches(&self, read: &Read) -> bool {
        if read.chr() != self.chr {
            return false;
        }
        if let Some(strand) = self.strand {
            if read.strand() != strand {
                return false;
            }
        }
        match self.window {
            Some((start, stop)) => read.start() <= stop && read.stop() >= start,
            None => true,
        }
    }
}

///
/// The read source contract used by every analysis.
///
/// Implementations may be backed by a database table, an indexed file or
/// memory. Filtering happens before reads reach this interface.
///
pub trait ReadsCollection: Sync {
    ///
    /// Call `callback` for every read matching `query`.
    ///
    /// The callback returns `ControlFlow::Break` to stop the iteration early.
    /// Errors returned by the callback abort the iteration and are passed on.
    ///
    fn for_each_read_on<F>(&self, query: &ReadQuery<'_>, callback: F) -> Result<()>
    where
        F: FnMut(&Read) -> Result<ControlFlow<()>>;

    /// Reference names with at least one read.
    fn distinct_reference_names(&self) -> Vec<String>;

    /// Sum of copy numbers over all reads.
    fn total_copy_number(&self) -> u64;

    /// Longest read, measured on the reference.
    fn longest_read_length(&self) -> u32;
}

#[derive(Debug, Default, Clone)]
struct ChromReads {
    // sorted by start
    reads: Vec<Read>,
    max_length: u32,
}

///
/// In-memory [`ReadsCollection`], indexed per chromosome by read start.
///
/// Window queries binary-search the first read that could reach the window,
/// using the longest read on that chromosome as look-behind.
///
#[derive(Debug, Default, Clone)]
pub struct ReadStore {
    chromosomes: FxHashMap<String, ChromReads>,
    total_copy_number: u64,
    longest_read_length: u32,
    len: usize,
}

impl ReadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reads<I>(reads: I) -> Self
    where
        I: IntoIterator<Item = Read>,
    {
        Self::from_reads_filtered(reads, &ReadFilter::new())
    }

    /// Keep only the reads accepted by `filter`.
    pub fn from_reads_filtered<I>(reads: I, filter: &ReadFilter) -> Self
    where
        I: IntoIterator<Item = Read>,
    {
        let mut store = ReadStore::new();
        let mut rejected: usize = 0;

        for read in reads {
            if !filter.accepts(&read) {
                rejected += 1;
                continue;
            }
            store.total_copy_number += read.copy_number as u64;
            store.longest_read_length = store.longest_read_length.max(read.length());
            store.len += 1;

            let chrom = store.chromosomes.entry(read.chr().to_string()).or_default();
            chrom.max_length = chrom.max_length.max(read.length());
            chrom.reads.push(read);
        }

        for chrom in store.chromosomes.values_mut() {
            chrom.reads.sort_by_key(|r| (r.start(), r.stop()));
        }

        if rejected > 0 {
            log::debug!("Filter rejected {} reads, kept {}", rejected, store.len);
        }

        store
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl ReadsCollection for ReadStore {
    fn for_each_read_on<F>(&self, query: &ReadQuery<'_>, mut callback: F) -> Result<()>
    where
        F: FnMut(&Read) -> Result<ControlFlow<()>>,
    {
        let Some(chrom) = self.chromosomes.get(query.chr) else {
            return Ok(());
        };

        let (first, last_start) = match query.window {
            Some((start, stop)) => {
                let lookbehind = start.saturating_sub(chrom.max_length);
                (
                    chrom.reads.partition_point(|r| r.start() < lookbehind),
                    stop,
                )
            }
            None => (0, u32::MAX),
        };

        for read in &chrom.reads[first..] {
            if read.start() > last_start {
                break;
            }
            if !query.matches(read) {
                continue;
            }
            if callback(read)?.is_break() {
                break;
            }
        }

        Ok(())
    }

    fn distinct_reference_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chromosomes.keys().cloned().collect();
        names.sort_by_key(|name| chrom_karyotype_key(name));
        names
    }

    fn total_copy_number(&self) -> u64 {
        self.total_copy_number
    }

    fn longest_read_length(&self) -> u32 {
        self.longest_read_length
    }
}
