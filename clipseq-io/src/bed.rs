use std::io::BufRead;
use std::path::Path;

use clipseq_core::filter::ReadFilter;
use clipseq_core::models::{GenomicInterval, Read, Strand};
use clipseq_core::utils::get_dynamic_reader;
use clipseq_core::ReadStore;

use crate::error::{ReadsIoError, Result};

fn malformed(line: usize, message: String) -> ReadsIoError {
    ReadsIoError::MalformedBed { line, message }
}

///
/// Parse one BED6 line into a read.
///
/// BED is half-open, reads are closed: `end` becomes `stop = end - 1`.
/// The score column is the copy number (`.` means 1) and the name column
/// the read id (`.` means none). Columns past the sixth are ignored.
///
/// # Arguments
///
/// - line: the raw line, without its newline
/// - line_number: 1-based, used in error messages
///
pub fn parse_bed6_line(line: &str, line_number: usize) -> Result<Read> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 6 {
        return Err(malformed(
            line_number,
            format!("expected 6 columns, found {}", fields.len()),
        ));
    }

    let start: u32 = fields[1]
        .parse()
        .map_err(|e| malformed(line_number, format!("start '{}': {}", fields[1], e)))?;
    let end: u32 = fields[2]
        .parse()
        .map_err(|e| malformed(line_number, format!("end '{}': {}", fields[2], e)))?;
    if end <= start {
        return Err(malformed(
            line_number,
            format!("end {} is not greater than start {}", end, start),
        ));
    }

    let copy_number: u32 = match fields[4] {
        "." => 1,
        score => score
            .parse()
            .map_err(|e| malformed(line_number, format!("score '{}': {}", score, e)))?,
    };
    if copy_number == 0 {
        return Err(malformed(
            line_number,
            "score (copy number) must be at least 1".to_string(),
        ));
    }

    let strand = fields[5]
        .chars()
        .next()
        .and_then(Strand::from_char)
        .filter(|_| fields[5].len() == 1)
        .ok_or_else(|| malformed(line_number, format!("strand '{}' is not + or -", fields[5])))?;

    let interval = GenomicInterval::new(fields[0], start, end - 1, strand)?;
    let read = Read::new(interval, copy_number)?;

    Ok(match fields[3] {
        "." | "" => read,
        name => read.with_id(name),
    })
}

fn is_header(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

///
/// Load BED6 reads from a reader, keeping those accepted by `filter`.
///
pub fn read_bed6_from<R: BufRead>(reader: R, filter: &ReadFilter) -> Result<ReadStore> {
    let mut reads = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if is_header(line) {
            continue;
        }
        reads.push(parse_bed6_line(line, idx + 1)?);
    }

    let parsed = reads.len();
    let store = ReadStore::from_reads_filtered(reads, filter);
    log::debug!("Parsed {} reads, kept {}", parsed, store.len());

    Ok(store)
}

///
/// Load a (optionally gzipped) BED6 file of reads.
///
/// # Arguments
///
/// - path: path to a `.bed` or `.bed.gz` file
/// - filter: reads not accepted are dropped while loading
///
pub fn read_bed6<P: AsRef<Path>>(path: P, filter: &ReadFilter) -> Result<ReadStore> {
    let reader = get_dynamic_reader(path.as_ref())?;
    read_bed6_from(reader, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipseq_core::filter::ReadPredicate;
    use clipseq_core::{ReadQuery, ReadsCollection};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::{Cursor, Write};
    use std::ops::ControlFlow;

    const BED: &str = "track name=reads\n\
        chr1\t100\t200\tr1\t3\t+\n\
        # comment\n\
        chr1\t50\t60\t.\t.\t-\n\
        chr2\t0\t25\tr3\t1\t+\textra\n";

    #[rstest]
    fn test_parse_line_to_closed_interval() {
        let read = parse_bed6_line("chr1\t100\t200\tr1\t3\t+", 1).unwrap();
        assert_eq!(read.start(), 100);
        assert_eq!(read.stop(), 199);
        assert_eq!(read.length(), 100);
        assert_eq!(read.copy_number, 3);
        assert_eq!(read.strand(), Strand::Forward);
        assert_eq!(read.id.as_deref(), Some("r1"));
    }

    #[rstest]
    #[case("chr1\t100\t200\tr1\t3", "expected 6 columns")]
    #[case("chr1\tx\t200\tr1\t3\t+", "start")]
    #[case("chr1\t200\t200\tr1\t3\t+", "not greater")]
    #[case("chr1\t100\t200\tr1\t0\t+", "at least 1")]
    #[case("chr1\t100\t200\tr1\t2.5\t+", "score")]
    #[case("chr1\t100\t200\tr1\t1\t.", "strand")]
    #[case("chr1\t100\t200\tr1\t1\t+-", "strand")]
    fn test_malformed_lines(#[case] line: &str, #[case] message_part: &str) {
        match parse_bed6_line(line, 7) {
            Err(ReadsIoError::MalformedBed { line, message }) => {
                assert_eq!(line, 7);
                assert!(message.contains(message_part), "{}", message);
            }
            other => panic!("expected a malformed line error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_read_bed6_skips_headers() {
        let store = read_bed6_from(Cursor::new(BED), &ReadFilter::new()).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.total_copy_number(), 5);
        assert_eq!(store.longest_read_length(), 100);
        assert_eq!(
            store.distinct_reference_names(),
            vec!["chr1".to_string(), "chr2".to_string()]
        );

        let mut ids = Vec::new();
        store
            .for_each_read_on(&ReadQuery::chromosome("chr1"), |r| {
                ids.push(r.id.clone());
                Ok(ControlFlow::Continue(()))
            })
            .unwrap();
        assert_eq!(ids, vec![None, Some("r1".to_string())]);
    }

    #[rstest]
    fn test_error_reports_file_line_number() {
        let data = "chr1\t0\t10\tr\t1\t+\n\nchr1\t0\t10\tr\t1\n";
        assert!(matches!(
            read_bed6_from(Cursor::new(data), &ReadFilter::new()),
            Err(ReadsIoError::MalformedBed { line: 3, .. })
        ));
    }

    #[rstest]
    fn test_filter_applies_while_loading() {
        let filter = ReadFilter::new().with(ReadPredicate::MinCopyNumber(2));
        let store = read_bed6_from(Cursor::new(BED), &filter).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_copy_number(), 3);
    }

    #[rstest]
    fn test_read_gzipped_bed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.bed.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(BED.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let store = read_bed6(&path, &ReadFilter::new()).unwrap();
        assert_eq!(store.len(), 3);
    }
}
