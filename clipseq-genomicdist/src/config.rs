use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GenomicDistError, Result};

///
/// Parameters of a genic-element distribution.
///
/// Every length threshold is applied to the feature span (exonic length for
/// UTRs and CDS); shorter features are left out of the averages.
///
/// ```toml
/// bins = 20
/// min_utr5_length = 30
/// min_cds_length = 90
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BinningConfig {
    pub bins: u32,
    pub min_utr5_length: u32,
    pub min_cds_length: u32,
    pub min_utr3_length: u32,
    pub min_exon_length: u32,
    pub min_intron_length: u32,
}

impl Default for BinningConfig {
    fn default() -> Self {
        BinningConfig {
            bins: 10,
            min_utr5_length: 0,
            min_cds_length: 0,
            min_utr3_length: 0,
            min_exon_length: 0,
            min_intron_length: 0,
        }
    }
}

impl BinningConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bins == 0 {
            return Err(GenomicDistError::InvalidBinning(
                "bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl TryFrom<&Path> for BinningConfig {
    type Error = GenomicDistError;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config: BinningConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
