use crate::errors::{ClipSeqError, Result};
use crate::models::interval::{GenomicInterval, Strand};

///
/// An aligned read, possibly standing for several identical source reads.
///
/// `copy_number` is the number of physically identical reads collapsed into
/// this record; aggregates are weighted by it.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub id: Option<String>,
    pub interval: GenomicInterval,
    pub copy_number: u32,
    pub number_of_mappings: u32,
    pub sequence: String,
    pub cigar: String,
    pub query_length: u32,
    pub alignment_length: u32,
}

impl Read {
    pub fn new(interval: GenomicInterval, copy_number: u32) -> Result<Self> {
        if copy_number == 0 {
            return Err(ClipSeqError::InvalidCopyNumber(copy_number));
        }
        let length = interval.length();
        Ok(Read {
            id: None,
            interval,
            copy_number,
            number_of_mappings: 1,
            sequence: String::new(),
            cigar: format!("{}M", length),
            query_length: length,
            alignment_length: length,
        })
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_sequence(mut self, sequence: &str) -> Self {
        self.query_length = sequence.len() as u32;
        self.sequence = sequence.to_string();
        self
    }

    pub fn with_cigar(mut self, cigar: &str) -> Self {
        self.cigar = cigar.to_string();
        self
    }

    pub fn with_mappings(mut self, number_of_mappings: u32) -> Self {
        self.number_of_mappings = number_of_mappings;
        self
    }

    #[inline]
    pub fn chr(&self) -> &str {
        &self.interval.chr
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.interval.start
    }

    #[inline]
    pub fn stop(&self) -> u32 {
        self.interval.stop
    }

    #[inline]
    pub fn strand(&self) -> Strand {
        self.interval.strand
    }

    #[inline]
    pub fn midpoint(&self) -> u32 {
        self.interval.midpoint()
    }

    /// Length on the reference.
    #[inline]
    pub fn length(&self) -> u32 {
        self.interval.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_zero_copy_number_is_rejected() {
        let interval = GenomicInterval::new("chr1", 0, 9, Strand::Forward).unwrap();
        assert!(matches!(
            Read::new(interval, 0),
            Err(ClipSeqError::InvalidCopyNumber(0))
        ));
    }

    #[rstest]
    fn test_defaults_follow_interval() {
        let interval = GenomicInterval::new("chr1", 100, 119, Strand::Reverse).unwrap();
        let read = Read::new(interval, 2).unwrap();
        assert_eq!(read.query_length, 20);
        assert_eq!(read.alignment_length, 20);
        assert_eq!(read.cigar, "20M");
        assert_eq!(read.number_of_mappings, 1);
        assert_eq!(read.strand(), Strand::Reverse);
    }

    #[rstest]
    fn test_sequence_sets_query_length() {
        let interval = GenomicInterval::new("chr1", 100, 119, Strand::Forward).unwrap();
        let read = Read::new(interval, 1)
            .unwrap()
            .with_id("r1")
            .with_sequence("ACGTACGTAC")
            .with_cigar("10M10N10M");
        assert_eq!(read.query_length, 10);
        assert_eq!(read.alignment_length, 20);
        assert_eq!(read.id.as_deref(), Some("r1"));
    }
}
