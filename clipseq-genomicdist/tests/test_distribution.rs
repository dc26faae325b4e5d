//! Distribution of reads over the same transcript on both strands.

use clipseq_core::ReadStore;
use clipseq_core::models::{GenomicInterval, Read, Strand, Transcript};
use clipseq_genomicdist::{BinTable, BinningConfig, PositionalBinner, genic_distribution};
use pretty_assertions::assert_eq;
use rstest::*;

fn read(start: u32, stop: u32, strand: Strand, copy_number: u32) -> Read {
    Read::new(
        GenomicInterval::new("chr1", start, stop, strand).unwrap(),
        copy_number,
    )
    .unwrap()
}

/// Three exons, coding from the middle of the first to the middle of the last.
fn transcript(strand: Strand) -> Transcript {
    let exons = vec![(1000, 1199), (1500, 1599), (2000, 2299)];
    Transcript::from_exons("tx", None, "chr1", strand, exons, Some((1100, 2149))).unwrap()
}

fn reads_on(strand: Strand) -> Vec<Read> {
    vec![
        read(1010, 1020, strand, 3),
        read(1150, 1160, strand, 1),
        read(1300, 1310, strand, 8),
        read(1550, 1560, strand, 2),
        read(1580, 1590, strand, 6),
        read(2100, 2110, strand, 5),
        read(2290, 2298, strand, 4),
    ]
}

fn reversed_sums(table: &BinTable, category: &str) -> Vec<u64> {
    let mut sums = table.category(category).unwrap().sums().to_vec();
    sums.reverse();
    sums
}

#[rstest]
#[case(3)]
#[case(10)]
#[case(17)]
fn test_flipping_strand_mirrors_every_category(#[case] bins: u32) {
    let config = BinningConfig {
        bins,
        ..Default::default()
    };

    let plus = genic_distribution(
        &ReadStore::from_reads(reads_on(Strand::Forward)),
        &[transcript(Strand::Forward)],
        &config,
    )
    .unwrap();
    let minus = genic_distribution(
        &ReadStore::from_reads(reads_on(Strand::Reverse)),
        &[transcript(Strand::Reverse)],
        &config,
    )
    .unwrap();

    // the leftmost UTR is the 5'UTR on plus and the 3'UTR on minus
    let pairs = [
        ("utr5", "utr3"),
        ("cds", "cds"),
        ("utr3", "utr5"),
        ("exon", "exon"),
        ("intron", "intron"),
    ];
    for (plus_category, minus_category) in pairs {
        assert_eq!(
            plus.category(plus_category).unwrap().sums(),
            reversed_sums(&minus, minus_category).as_slice(),
            "{} against {}",
            plus_category,
            minus_category
        );
        assert_eq!(
            plus.category(plus_category).unwrap().features_counted(),
            minus.category(minus_category).unwrap().features_counted()
        );
    }
}

#[rstest]
fn test_exonic_reads_are_all_counted_once() {
    let reads = ReadStore::from_reads(reads_on(Strand::Forward));
    let tx = transcript(Strand::Forward);
    let binner = PositionalBinner::new(&reads, 10).unwrap();

    let buckets = binner.bin_feature(&reads, tx.exonic()).unwrap().unwrap();
    // every read but the intronic one at 1300
    assert_eq!(buckets.iter().sum::<u64>(), 3 + 1 + 2 + 6 + 5 + 4);
}

#[rstest]
fn test_utr_and_cds_partition_the_exonic_reads() {
    let reads = ReadStore::from_reads(reads_on(Strand::Forward));
    let table =
        genic_distribution(&reads, &[transcript(Strand::Forward)], &BinningConfig::default())
            .unwrap();

    let total = |name: &str| -> u64 { table.category(name).unwrap().sums().iter().sum() };
    assert_eq!(total("utr5"), 3);
    assert_eq!(total("cds"), 1 + 2 + 6 + 5);
    assert_eq!(total("utr3"), 4);
    assert_eq!(total("intron"), 8);
}
