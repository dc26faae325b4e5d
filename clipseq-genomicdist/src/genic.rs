use std::fmt::{self, Display};

use clipseq_core::ReadsCollection;
use clipseq_core::models::{GenomicInterval, SplicedFeature, Transcript};

use crate::binning::{BinTable, PositionalBinner};
use crate::config::BinningConfig;
use crate::errors::{GenomicDistError, Result};

/// Transcript elements reads are distributed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenicElement {
    Utr5,
    Cds,
    Utr3,
    Exon,
    Intron,
}

impl GenicElement {
    pub const ALL: [GenicElement; 5] = [
        GenicElement::Utr5,
        GenicElement::Cds,
        GenicElement::Utr3,
        GenicElement::Exon,
        GenicElement::Intron,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GenicElement::Utr5 => "utr5",
            GenicElement::Cds => "cds",
            GenicElement::Utr3 => "utr3",
            GenicElement::Exon => "exon",
            GenicElement::Intron => "intron",
        }
    }

    pub fn min_length(&self, config: &BinningConfig) -> u32 {
        match self {
            GenicElement::Utr5 => config.min_utr5_length,
            GenicElement::Cds => config.min_cds_length,
            GenicElement::Utr3 => config.min_utr3_length,
            GenicElement::Exon => config.min_exon_length,
            GenicElement::Intron => config.min_intron_length,
        }
    }
}

impl Display for GenicElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn coding_parts<'a, G>(transcripts: &'a [Transcript], get: G) -> Vec<&'a SplicedFeature>
where
    G: Fn(&'a Transcript) -> Option<&'a SplicedFeature>,
{
    transcripts
        .iter()
        .filter(|t| t.is_coding())
        .filter_map(get)
        .collect()
}

fn linear_parts<'a, G>(transcripts: &'a [Transcript], get: G) -> Vec<&'a GenomicInterval>
where
    G: Fn(&'a Transcript) -> &'a [GenomicInterval],
{
    transcripts.iter().flat_map(get).collect()
}

///
/// Distribute `reads` over the elements of `transcripts`.
///
/// UTRs and CDS are binned in exonic coordinates over coding transcripts.
/// Exons and introns are binned as linear features over every transcript.
/// Each element becomes one category of the returned table, in the order of
/// [`GenicElement::ALL`].
///
pub fn genic_distribution<R: ReadsCollection>(
    reads: &R,
    transcripts: &[Transcript],
    config: &BinningConfig,
) -> Result<BinTable> {
    config.validate()?;
    if transcripts.is_empty() {
        return Err(GenomicDistError::MissingAnnotation);
    }

    let binner = PositionalBinner::new(reads, config.bins)?;
    let mut table = BinTable::new(reads.total_copy_number());

    for element in GenicElement::ALL {
        let label = element.label();
        let min_length = element.min_length(config);
        let accumulator = match element {
            GenicElement::Utr5 => {
                let features = coding_parts(transcripts, |t| t.utr5.as_ref());
                binner.bin_category(reads, label, &features, min_length)?
            }
            GenicElement::Cds => {
                let features = coding_parts(transcripts, |t| t.cds.as_ref());
                binner.bin_category(reads, label, &features, min_length)?
            }
            GenicElement::Utr3 => {
                let features = coding_parts(transcripts, |t| t.utr3.as_ref());
                binner.bin_category(reads, label, &features, min_length)?
            }
            GenicElement::Exon => {
                let features = linear_parts(transcripts, |t| t.exons.as_slice());
                binner.bin_category(reads, label, &features, min_length)?
            }
            GenicElement::Intron => {
                let features = linear_parts(transcripts, |t| t.introns.as_slice());
                binner.bin_category(reads, label, &features, min_length)?
            }
        };
        log::info!(
            "{}: {} features binned, {} excluded",
            label,
            accumulator.features_counted(),
            accumulator.features_excluded()
        );
        table.push(accumulator);
    }

    Ok(table)
}
