use thiserror::Error;

use clipseq_core::ClipSeqError;

#[derive(Error, Debug)]
pub enum GenomicDistError {
    #[error("Invalid binning configuration: {0}")]
    InvalidBinning(String),
    #[error("No transcripts were supplied")]
    MissingAnnotation,
    #[error(transparent)]
    Core(#[from] ClipSeqError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GenomicDistError>;
