use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use clipseq_genomicdist::BinRow;
use clipseq_occupancy::{CoverageRow, DensityRow, OverlapStats};

use crate::error::Result;

/// Written in place of undefined values.
pub const NA: &str = "NA";

///
/// A row of a tab separated result table.
///
/// The header and the field order are part of the output format.
///
pub trait TsvRecord {
    fn header() -> &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

fn float(value: f64) -> String {
    format!("{:.6}", value)
}

fn optional_float(value: Option<f64>) -> String {
    value.map(float).unwrap_or_else(|| NA.to_string())
}

impl TsvRecord for CoverageRow {
    fn header() -> &'static [&'static str] {
        &["rname", "size", "covered_area", "percent_covered"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.rname.clone(),
            self.size.to_string(),
            self.covered_area.to_string(),
            float(self.percent_covered),
        ]
    }
}

impl TsvRecord for OverlapStats {
    fn header() -> &'static [&'static str] {
        &[
            "total_records",
            "overlapping_records",
            "percent_overlapping_records",
            "total_copy_number",
            "overlapping_copy_number",
            "percent_overlapping_copy_number",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.total_records.to_string(),
            self.overlapping_records.to_string(),
            optional_float(self.percent_overlapping_records()),
            self.total_copy_number.to_string(),
            self.overlapping_copy_number.to_string(),
            optional_float(self.percent_overlapping_copy_number()),
        ]
    }
}

impl TsvRecord for DensityRow {
    fn header() -> &'static [&'static str] {
        &[
            "relative_position",
            "sense",
            "antisense",
            "sense_copy_number",
            "antisense_copy_number",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.relative_position.to_string(),
            self.sense.to_string(),
            self.antisense.to_string(),
            self.sense_copy_number.to_string(),
            self.antisense_copy_number.to_string(),
        ]
    }
}

impl TsvRecord for BinRow {
    fn header() -> &'static [&'static str] {
        &[
            "bin",
            "category",
            "features",
            "summed_count",
            "mean_count",
            "count_per_nucleotide",
            "rpkm",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.bin.to_string(),
            self.category.clone(),
            self.features.to_string(),
            self.summed_count.to_string(),
            optional_float(self.mean_count),
            optional_float(self.count_per_nucleotide),
            optional_float(self.rpkm),
        ]
    }
}

///
/// Write `records` as a table: optional `# key=value` comment lines, a
/// header row, then one line per record.
///
pub fn write_tsv_to<W: Write, T: TsvRecord>(
    writer: &mut W,
    preamble: &[(&str, String)],
    records: &[T],
) -> std::io::Result<()> {
    for (key, value) in preamble {
        writeln!(writer, "# {}={}", key, value)?;
    }
    writeln!(writer, "{}", T::header().join("\t"))?;
    for record in records {
        writeln!(writer, "{}", record.fields().join("\t"))?;
    }
    Ok(())
}

///
/// Write a table to disk, gzipped when the path ends in `.gz`.
///
/// # Arguments
/// - path: the file to create; parent directories are created as needed
/// - preamble: `# key=value` lines written before the header
/// - records: the rows
///
pub fn write_tsv<P: AsRef<Path>, T: TsvRecord>(
    path: P,
    preamble: &[(&str, String)],
    records: &[T],
) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        write_tsv_to(&mut encoder, preamble, records)?;
        encoder.finish()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_tsv_to(&mut writer, preamble, records)?;
        writer.flush()?;
    }

    log::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
