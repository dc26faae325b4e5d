use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use fxhash::FxHashMap;

use crate::errors::{ClipSeqError, Result};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// Returns a sort key that orders chromosome names karyotypically:
/// numeric (1, 2, …, 22) → X → Y → M/MT → everything else alphabetically.
pub fn chrom_karyotype_key(chr: &str) -> (u8, u32, String) {
    let bare = chr.strip_prefix("chr").unwrap_or(chr);
    match bare {
        "X" => (1, 0, String::new()),
        "Y" => (2, 0, String::new()),
        "M" | "MT" => (3, 0, String::new()),
        _ => match bare.parse::<u32>() {
            Ok(n) => (0, n, String::new()),
            Err(_) => (4, 0, bare.to_string()),
        },
    }
}

///
/// Chromosome lengths, in the order they were declared.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromSizes {
    names: Vec<String>,
    sizes: FxHashMap<String, u32>,
}

impl ChromSizes {
    /// Parse `name\tsize` lines. Blank lines and `#` comments are skipped.
    /// A file without any chromosome is an error.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut chrom_sizes = ChromSizes::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed.split_whitespace();
            let (Some(name), Some(size)) = (fields.next(), fields.next()) else {
                return Err(ClipSeqError::Parse {
                    line: idx + 1,
                    message: format!("chrom.sizes line has fewer than 2 fields: '{}'", trimmed),
                });
            };
            let size: u32 = size.parse().map_err(|e| ClipSeqError::Parse {
                line: idx + 1,
                message: format!("Cannot parse size '{}': {}", size, e),
            })?;

            chrom_sizes.insert(name, size)?;
        }

        if chrom_sizes.is_empty() {
            return Err(ClipSeqError::InvalidChromSizes(
                "no chromosome declared".to_string(),
            ));
        }

        Ok(chrom_sizes)
    }

    /// Declare a chromosome. Zero lengths and duplicates are errors.
    pub fn insert(&mut self, name: &str, size: u32) -> Result<()> {
        if size == 0 {
            return Err(ClipSeqError::InvalidChromSizes(format!(
                "chromosome {} has length 0",
                name
            )));
        }
        if self.sizes.insert(name.to_string(), size).is_some() {
            return Err(ClipSeqError::InvalidChromSizes(format!(
                "chromosome {} is declared twice",
                name
            )));
        }
        self.names.push(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.sizes.get(name).copied()
    }

    /// Like [`ChromSizes::get`] but a missing chromosome is an error.
    pub fn require(&self, name: &str) -> Result<u32> {
        self.get(name)
            .ok_or_else(|| ClipSeqError::UnknownChromosome(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.names
            .iter()
            .map(move |name| (name.as_str(), self.sizes[name]))
    }

    pub fn genome_size(&self) -> u64 {
        self.sizes.values().map(|&v| v as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TryFrom<&Path> for ChromSizes {
    type Error = ClipSeqError;

    fn try_from(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        ChromSizes::from_reader(reader)
    }
}

impl TryFrom<&str> for ChromSizes {
    type Error = ClipSeqError;

    fn try_from(path: &str) -> Result<Self> {
        ChromSizes::try_from(Path::new(path))
    }
}

impl TryFrom<Vec<(&str, u32)>> for ChromSizes {
    type Error = ClipSeqError;

    fn try_from(entries: Vec<(&str, u32)>) -> Result<Self> {
        let mut chrom_sizes = ChromSizes::default();
        for (name, size) in entries {
            chrom_sizes.insert(name, size)?;
        }
        Ok(chrom_sizes)
    }
}
