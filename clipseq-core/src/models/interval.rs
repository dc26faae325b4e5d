use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ClipSeqError, Result};

/// Strand of a read or feature on the reference.
///
/// Written as `+` / `-` in BED files; `1` / `-1` are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    pub fn from_char(c: char) -> Option<Strand> {
        match c {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }

    pub fn opposite(&self) -> Strand {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }

    /// Re-orient an offset measured from the leftmost base of a feature of
    /// length `span` so that it is measured from the feature's 5' end.
    ///
    /// On the reverse strand the 5' end is the rightmost base, so offset `o`
    /// becomes `span - 1 - o`. `offset` must be lower than `span`.
    #[inline]
    pub fn orient(&self, offset: u32, span: u32) -> u32 {
        match self {
            Strand::Forward => offset,
            Strand::Reverse => span - 1 - offset,
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Strand {
    type Err = ClipSeqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" | "1" | "+1" => Ok(Strand::Forward),
            "-" | "-1" => Ok(Strand::Reverse),
            _ => Err(ClipSeqError::InvalidConfig(format!(
                "unrecognized strand '{}'",
                s
            ))),
        }
    }
}

/// A closed range `[start, stop]` of 0-based positions on a named reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    pub chr: String,
    pub start: u32,
    pub stop: u32,
    pub strand: Strand,
}

impl GenomicInterval {
    pub fn new(chr: &str, start: u32, stop: u32, strand: Strand) -> Result<Self> {
        if start > stop {
            return Err(ClipSeqError::InvalidInterval {
                chr: chr.to_string(),
                start,
                stop,
            });
        }
        Ok(GenomicInterval {
            chr: chr.to_string(),
            start,
            stop,
            strand,
        })
    }

    /// Number of bases covered, both ends included.
    #[inline]
    pub fn length(&self) -> u32 {
        self.stop - self.start + 1
    }

    /// Same reference and intersecting ranges. Strand is ignored.
    #[inline]
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chr == other.chr && self.start <= other.stop && other.start <= self.stop
    }

    #[inline]
    pub fn contains_position(&self, pos: u32) -> bool {
        self.start <= pos && pos <= self.stop
    }

    /// `floor((start + stop) / 2)`, the canonical position of a read.
    #[inline]
    pub fn midpoint(&self) -> u32 {
        ((self.start as u64 + self.stop as u64) / 2) as u32
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}({})", self.chr, self.start, self.stop, self.strand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn iv(chr: &str, start: u32, stop: u32, strand: Strand) -> GenomicInterval {
        GenomicInterval::new(chr, start, stop, strand).unwrap()
    }

    #[rstest]
    fn test_start_after_stop_is_rejected() {
        let result = GenomicInterval::new("chr1", 10, 9, Strand::Forward);
        assert!(matches!(
            result,
            Err(ClipSeqError::InvalidInterval { start: 10, stop: 9, .. })
        ));
    }

    #[rstest]
    fn test_single_base_interval() {
        let i = iv("chr1", 5, 5, Strand::Forward);
        assert_eq!(i.length(), 1);
        assert_eq!(i.midpoint(), 5);
        assert!(i.contains_position(5));
        assert!(!i.contains_position(6));
    }

    #[rstest]
    #[case(100, 199, 149)]
    #[case(100, 200, 150)]
    #[case(0, 1, 0)]
    fn test_midpoint_floors(#[case] start: u32, #[case] stop: u32, #[case] expected: u32) {
        assert_eq!(iv("chr1", start, stop, Strand::Forward).midpoint(), expected);
    }

    #[rstest]
    #[case((10, 20), (20, 30), true)]
    #[case((10, 20), (21, 30), false)]
    #[case((10, 20), (0, 10), true)]
    #[case((10, 20), (12, 13), true)]
    #[case((10, 20), (0, 9), false)]
    fn test_overlap_is_symmetric(
        #[case] a: (u32, u32),
        #[case] b: (u32, u32),
        #[case] expected: bool,
    ) {
        let a = iv("chr1", a.0, a.1, Strand::Forward);
        let b = iv("chr1", b.0, b.1, Strand::Forward);
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    fn test_overlap_requires_same_reference() {
        let a = iv("chr1", 10, 20, Strand::Forward);
        let b = iv("chr2", 10, 20, Strand::Forward);
        assert!(!a.overlaps(&b));
    }

    #[rstest]
    #[case("+", Strand::Forward)]
    #[case("1", Strand::Forward)]
    #[case("-1", Strand::Reverse)]
    #[case("-", Strand::Reverse)]
    fn test_strand_from_str(#[case] s: &str, #[case] expected: Strand) {
        assert_eq!(s.parse::<Strand>().unwrap(), expected);
    }

    #[rstest]
    fn test_strand_from_str_rejects_unknown() {
        assert!(".".parse::<Strand>().is_err());
    }

    #[rstest]
    fn test_orient() {
        assert_eq!(Strand::Forward.orient(3, 10), 3);
        assert_eq!(Strand::Reverse.orient(3, 10), 6);
        assert_eq!(Strand::Reverse.orient(0, 10), 9);
        assert_eq!(Strand::Reverse.orient(9, 10), 0);
    }
}
