use crate::errors::{ClipSeqError, Result};
use crate::models::interval::{GenomicInterval, Strand};

/// A feature made of exonic parts on one reference and strand, such as a
/// 5'UTR, a CDS or a whole spliced transcript.
///
/// Parts are kept in ascending genomic order and never overlap. Positions
/// inside the feature are expressed in exonic coordinates: introns between
/// parts are skipped, so the base right after a splice junction is exactly one
/// past the last base of the preceding part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedFeature {
    chr: String,
    strand: Strand,
    parts: Vec<(u32, u32)>,
    exonic_length: u32,
}

impl SplicedFeature {
    ///
    /// Build a feature from closed `(start, stop)` parts.
    ///
    /// Parts may be given in any order; they are sorted by start. Empty input,
    /// an inverted part or two parts sharing a base are errors.
    ///
    pub fn new(chr: &str, strand: Strand, mut parts: Vec<(u32, u32)>) -> Result<Self> {
        if parts.is_empty() {
            return Err(ClipSeqError::InvalidFeature(format!(
                "feature on {}({}) has no parts",
                chr, strand
            )));
        }
        if let Some(&(start, stop)) = parts.iter().find(|(start, stop)| start > stop) {
            return Err(ClipSeqError::InvalidInterval {
                chr: chr.to_string(),
                start,
                stop,
            });
        }

        parts.sort_unstable();
        for pair in parts.windows(2) {
            if pair[1].0 <= pair[0].1 {
                return Err(ClipSeqError::NonMonotonicFeature(format!(
                    "{}:{}-{} overlaps {}:{}-{}",
                    chr, pair[0].0, pair[0].1, chr, pair[1].0, pair[1].1
                )));
            }
        }

        let exonic_length = parts.iter().map(|(start, stop)| stop - start + 1).sum();

        Ok(SplicedFeature {
            chr: chr.to_string(),
            strand,
            parts,
            exonic_length,
        })
    }

    /// Build a feature from intervals that must share reference and strand.
    pub fn from_intervals(intervals: &[GenomicInterval]) -> Result<Self> {
        let first = intervals.first().ok_or_else(|| {
            ClipSeqError::InvalidFeature("feature has no parts".to_string())
        })?;
        if let Some(other) = intervals
            .iter()
            .find(|i| i.chr != first.chr || i.strand != first.strand)
        {
            return Err(ClipSeqError::InvalidFeature(format!(
                "parts {} and {} are not on the same reference and strand",
                first, other
            )));
        }
        SplicedFeature::new(
            &first.chr,
            first.strand,
            intervals.iter().map(|i| (i.start, i.stop)).collect(),
        )
    }

    pub fn chr(&self) -> &str {
        &self.chr
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Leftmost genomic base.
    pub fn start(&self) -> u32 {
        self.parts[0].0
    }

    /// Rightmost genomic base.
    pub fn stop(&self) -> u32 {
        self.parts[self.parts.len() - 1].1
    }

    /// Parts in ascending genomic order.
    pub fn parts(&self) -> &[(u32, u32)] {
        &self.parts
    }

    /// Sum of the part lengths.
    pub fn exonic_length(&self) -> u32 {
        self.exonic_length
    }

    /// Whole genomic extent, introns included.
    pub fn genomic_span(&self) -> GenomicInterval {
        GenomicInterval {
            chr: self.chr.clone(),
            start: self.start(),
            stop: self.stop(),
            strand: self.strand,
        }
    }

    ///
    /// Offset of `pos` from the leftmost exonic base, or `None` if `pos` is
    /// not inside any part.
    ///
    /// The offset is strand independent; see
    /// [`SplicedFeature::relative_exonic_position`] for the 5' oriented one.
    ///
    pub fn ascending_exonic_position(&self, pos: u32) -> Option<u32> {
        let mut consumed = 0;
        for &(start, stop) in &self.parts {
            if pos < start {
                return None;
            }
            if pos <= stop {
                return Some(consumed + pos - start);
            }
            consumed += stop - start + 1;
        }
        None
    }

    ///
    /// Offset of `pos` from the 5' end of the feature in exonic coordinates,
    /// or `None` if `pos` is not inside any part.
    ///
    /// On the reverse strand the ascending offset is subtracted from the
    /// exonic length: `exonic_length - 1 - ascending_exonic_position(pos)`.
    ///
    pub fn relative_exonic_position(&self, pos: u32) -> Option<u32> {
        self.ascending_exonic_position(pos)
            .map(|offset| self.strand.orient(offset, self.exonic_length))
    }
}
