use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ClipSeqError, Result};
use crate::filter::{ReadFilter, ReadPredicate};
use crate::models::Strand;

///
/// Read filter as written in a TOML file, e.g.
///
/// ```toml
/// min_length = 18
/// max_mappings = 1
/// strand = "+"
/// chromosomes = ["chr1", "chr2"]
/// ```
///
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReadFilterConfig {
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub min_copy_number: Option<u32>,
    pub max_mappings: Option<u32>,
    pub strand: Option<Strand>,
    pub chromosomes: Option<Vec<String>>,
}

impl ReadFilterConfig {
    /// Validate the bounds and turn the config into a [`ReadFilter`].
    pub fn into_filter(self) -> Result<ReadFilter> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(ClipSeqError::InvalidConfig(format!(
                    "min_length ({}) is greater than max_length ({})",
                    min, max
                )));
            }
        }
        if self.max_mappings == Some(0) {
            return Err(ClipSeqError::InvalidConfig(
                "max_mappings must be at least 1".to_string(),
            ));
        }

        let mut filter = ReadFilter::new();
        if let Some(n) = self.min_length {
            filter = filter.with(ReadPredicate::MinLength(n));
        }
        if let Some(n) = self.max_length {
            filter = filter.with(ReadPredicate::MaxLength(n));
        }
        if let Some(n) = self.min_copy_number {
            filter = filter.with(ReadPredicate::MinCopyNumber(n));
        }
        if let Some(n) = self.max_mappings {
            filter = filter.with(ReadPredicate::MaxMappings(n));
        }
        if let Some(strand) = self.strand {
            filter = filter.with(ReadPredicate::Strand(strand));
        }
        if let Some(chromosomes) = self.chromosomes {
            let names: HashSet<String> = chromosomes.into_iter().collect();
            filter = filter.with(ReadPredicate::Chromosomes(names));
        }

        Ok(filter)
    }
}

impl TryFrom<&Path> for ReadFilterConfig {
    type Error = ClipSeqError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
