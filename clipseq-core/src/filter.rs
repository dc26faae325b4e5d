//! Typed read predicates.
//!
//! A [`ReadFilter`] is built once, before any analysis runs, and applied while
//! a read source is loaded. Analyses only ever see reads that passed it.

use std::collections::HashSet;

use crate::models::{Read, Strand};

#[derive(Debug, Clone, PartialEq)]
pub enum ReadPredicate {
    /// `query_length >= n`
    MinLength(u32),
    /// `query_length <= n`
    MaxLength(u32),
    MinCopyNumber(u32),
    /// `number_of_mappings <= n`; `MaxMappings(1)` keeps unique mappers.
    MaxMappings(u32),
    Strand(Strand),
    Chromosomes(HashSet<String>),
}

impl ReadPredicate {
    pub fn accepts(&self, read: &Read) -> bool {
        match self {
            ReadPredicate::MinLength(n) => read.query_length >= *n,
            ReadPredicate::MaxLength(n) => read.query_length <= *n,
            ReadPredicate::MinCopyNumber(n) => read.copy_number >= *n,
            ReadPredicate::MaxMappings(n) => read.number_of_mappings <= *n,
            ReadPredicate::Strand(strand) => read.strand() == *strand,
            ReadPredicate::Chromosomes(names) => names.contains(read.chr()),
        }
    }
}

/// Conjunction of predicates. An empty filter accepts every read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadFilter {
    predicates: Vec<ReadPredicate>,
}

impl ReadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: ReadPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[ReadPredicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[inline]
    pub fn accepts(&self, read: &Read) -> bool {
        self.predicates.iter().all(|p| p.accepts(read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenomicInterval;
    use rstest::*;

    fn read(chr: &str, start: u32, stop: u32, strand: Strand, copy_number: u32) -> Read {
        Read::new(
            GenomicInterval::new(chr, start, stop, strand).unwrap(),
            copy_number,
        )
        .unwrap()
    }

    #[rstest]
    fn test_empty_filter_accepts_everything() {
        let filter = ReadFilter::new();
        assert!(filter.is_empty());
        assert!(filter.accepts(&read("chr1", 0, 9, Strand::Forward, 1)));
    }

    #[rstest]
    #[case(ReadPredicate::MinLength(10), true)]
    #[case(ReadPredicate::MinLength(11), false)]
    #[case(ReadPredicate::MaxLength(10), true)]
    #[case(ReadPredicate::MaxLength(9), false)]
    #[case(ReadPredicate::MinCopyNumber(3), true)]
    #[case(ReadPredicate::MinCopyNumber(4), false)]
    #[case(ReadPredicate::MaxMappings(1), true)]
    #[case(ReadPredicate::Strand(Strand::Forward), true)]
    #[case(ReadPredicate::Strand(Strand::Reverse), false)]
    fn test_single_predicates(#[case] predicate: ReadPredicate, #[case] expected: bool) {
        let r = read("chr1", 0, 9, Strand::Forward, 3);
        assert_eq!(predicate.accepts(&r), expected);
    }

    #[rstest]
    fn test_multi_mappers_are_dropped() {
        let r = read("chr1", 0, 9, Strand::Forward, 1).with_mappings(4);
        assert!(!ReadPredicate::MaxMappings(1).accepts(&r));
    }

    #[rstest]
    fn test_predicates_are_conjunctive() {
        let filter = ReadFilter::new()
            .with(ReadPredicate::MinLength(5))
            .with(ReadPredicate::Chromosomes(HashSet::from(["chr2".to_string()])));
        assert!(!filter.accepts(&read("chr1", 0, 9, Strand::Forward, 1)));
        assert!(filter.accepts(&read("chr2", 0, 9, Strand::Forward, 1)));
        assert!(!filter.accepts(&read("chr2", 0, 2, Strand::Forward, 1)));
    }
}
