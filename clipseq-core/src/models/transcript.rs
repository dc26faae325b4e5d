use crate::errors::{ClipSeqError, Result};
use crate::models::feature::SplicedFeature;
use crate::models::interval::{GenomicInterval, Strand};

///
/// A transcript with its exon/intron structure and, for coding transcripts,
/// its 5'UTR, CDS and 3'UTR as spliced features.
///
/// Exons and introns are stored in transcription order (5'→3').
///
#[derive(Debug, Clone)]
pub struct Transcript {
    pub id: String,
    pub gene_id: Option<String>,
    pub span: GenomicInterval,
    pub exons: Vec<GenomicInterval>,
    pub introns: Vec<GenomicInterval>,
    pub utr5: Option<SplicedFeature>,
    pub cds: Option<SplicedFeature>,
    pub utr3: Option<SplicedFeature>,
    exonic: SplicedFeature,
}

impl Transcript {
    ///
    /// Resolve a transcript from its exons and optional CDS boundaries.
    ///
    /// Exons are closed `(start, stop)` ranges in any order. `cds` is the
    /// closed genomic range from the first to the last coding base. Exonic
    /// bases upstream of the CDS (with respect to strand) form the 5'UTR,
    /// bases downstream form the 3'UTR. Introns are the gaps between exons.
    ///
    pub fn from_exons(
        id: &str,
        gene_id: Option<&str>,
        chr: &str,
        strand: Strand,
        exons: Vec<(u32, u32)>,
        cds: Option<(u32, u32)>,
    ) -> Result<Self> {
        let exonic = SplicedFeature::new(chr, strand, exons)?;
        let span = exonic.genomic_span();

        let mut exon_intervals: Vec<GenomicInterval> = exonic
            .parts()
            .iter()
            .map(|&(start, stop)| GenomicInterval {
                chr: chr.to_string(),
                start,
                stop,
                strand,
            })
            .collect();

        let mut introns: Vec<GenomicInterval> = exonic
            .parts()
            .windows(2)
            .filter(|pair| pair[1].0 > pair[0].1 + 1)
            .map(|pair| GenomicInterval {
                chr: chr.to_string(),
                start: pair[0].1 + 1,
                stop: pair[1].0 - 1,
                strand,
            })
            .collect();

        if strand == Strand::Reverse {
            exon_intervals.reverse();
            introns.reverse();
        }

        let (utr5, cds, utr3) = match cds {
            Some((cds_start, cds_stop)) => {
                split_coding(id, &exonic, cds_start, cds_stop)?
            }
            None => (None, None, None),
        };

        Ok(Transcript {
            id: id.to_string(),
            gene_id: gene_id.map(|g| g.to_string()),
            span,
            exons: exon_intervals,
            introns,
            utr5,
            cds,
            utr3,
            exonic,
        })
    }

    pub fn is_coding(&self) -> bool {
        self.cds.is_some()
    }

    pub fn chr(&self) -> &str {
        &self.span.chr
    }

    pub fn strand(&self) -> Strand {
        self.span.strand
    }

    /// The mature transcript as a single spliced feature.
    pub fn exonic(&self) -> &SplicedFeature {
        &self.exonic
    }

    pub fn exonic_length(&self) -> u32 {
        self.exonic.exonic_length()
    }
}

type CodingParts = (
    Option<SplicedFeature>,
    Option<SplicedFeature>,
    Option<SplicedFeature>,
);

/// Clip exons against the CDS range into left, coding and right parts.
fn split_coding(
    id: &str,
    exonic: &SplicedFeature,
    cds_start: u32,
    cds_stop: u32,
) -> Result<CodingParts> {
    if cds_start > cds_stop {
        return Err(ClipSeqError::InvalidInterval {
            chr: exonic.chr().to_string(),
            start: cds_start,
            stop: cds_stop,
        });
    }

    let mut left = Vec::new();
    let mut coding = Vec::new();
    let mut right = Vec::new();

    for &(start, stop) in exonic.parts() {
        if start < cds_start {
            left.push((start, stop.min(cds_start - 1)));
        }
        if start <= cds_stop && stop >= cds_start {
            coding.push((start.max(cds_start), stop.min(cds_stop)));
        }
        if stop > cds_stop {
            right.push((start.max(cds_stop + 1), stop));
        }
    }

    if coding.is_empty() {
        return Err(ClipSeqError::InvalidFeature(format!(
            "CDS {}-{} of transcript {} does not overlap any exon",
            cds_start, cds_stop, id
        )));
    }

    let build = |parts: Vec<(u32, u32)>| -> Result<Option<SplicedFeature>> {
        if parts.is_empty() {
            Ok(None)
        } else {
            SplicedFeature::new(exonic.chr(), exonic.strand(), parts).map(Some)
        }
    };

    let cds = build(coding)?;
    let (utr5, utr3) = match exonic.strand() {
        Strand::Forward => (build(left)?, build(right)?),
        Strand::Reverse => (build(right)?, build(left)?),
    };

    Ok((utr5, cds, utr3))
}
