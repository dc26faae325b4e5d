//! Features that reads can be binned along.

use clipseq_core::models::{GenomicInterval, SplicedFeature, Strand};

///
/// A stretch of the genome along which read positions can be expressed as
/// offsets.
///
/// Linear features (an exon, an intron) measure offsets on the genome.
/// Spliced features (a UTR, a CDS) measure them on the concatenated parts,
/// skipping introns.
///
pub trait PositionalFeature {
    fn chr(&self) -> &str;

    fn strand(&self) -> Strand;

    /// Leftmost genomic base.
    fn start(&self) -> u32;

    /// Rightmost genomic base.
    fn stop(&self) -> u32;

    /// Number of positions offsets can take.
    fn span(&self) -> u32;

    /// Offset of `pos` from the leftmost base, in `0..span()`, or `None`
    /// when the feature does not contain `pos`. Strand plays no part here.
    fn ascending_position(&self, pos: u32) -> Option<u32>;
}

impl PositionalFeature for GenomicInterval {
    fn chr(&self) -> &str {
        &self.chr
    }

    fn strand(&self) -> Strand {
        self.strand
    }

    fn start(&self) -> u32 {
        self.start
    }

    fn stop(&self) -> u32 {
        self.stop
    }

    fn span(&self) -> u32 {
        self.length()
    }

    fn ascending_position(&self, pos: u32) -> Option<u32> {
        self.contains_position(pos).then(|| pos - self.start)
    }
}

impl PositionalFeature for SplicedFeature {
    fn chr(&self) -> &str {
        SplicedFeature::chr(self)
    }

    fn strand(&self) -> Strand {
        SplicedFeature::strand(self)
    }

    fn start(&self) -> u32 {
        SplicedFeature::start(self)
    }

    fn stop(&self) -> u32 {
        SplicedFeature::stop(self)
    }

    fn span(&self) -> u32 {
        self.exonic_length()
    }

    fn ascending_position(&self, pos: u32) -> Option<u32> {
        self.ascending_exonic_position(pos)
    }
}

impl<T: PositionalFeature + ?Sized> PositionalFeature for &T {
    fn chr(&self) -> &str {
        (**self).chr()
    }

    fn strand(&self) -> Strand {
        (**self).strand()
    }

    fn start(&self) -> u32 {
        (**self).start()
    }

    fn stop(&self) -> u32 {
        (**self).stop()
    }

    fn span(&self) -> u32 {
        (**self).span()
    }

    fn ascending_position(&self, pos: u32) -> Option<u32> {
        (**self).ascending_position(pos)
    }
}
