use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipSeqError {
    #[error("Invalid interval {chr}:{start}-{stop}: start is greater than stop")]
    InvalidInterval { chr: String, start: u32, stop: u32 },

    #[error("Range {start}-{stop} is outside of [0, {length}) on {chr}")]
    OutOfRange {
        chr: String,
        start: u32,
        stop: u32,
        length: u32,
    },

    #[error("Feature parts are not monotonic: {0}")]
    NonMonotonicFeature(String),

    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    #[error("Invalid copy number {0}: copy number must be at least 1")]
    InvalidCopyNumber(u32),

    #[error("Chromosome not found in chromosome sizes: {0}")]
    UnknownChromosome(String),

    #[error("Invalid chromosome sizes: {0}")]
    InvalidChromSizes(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Error parsing line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ClipSeqError>;
