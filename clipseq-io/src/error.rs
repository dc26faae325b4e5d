use std::io;
use thiserror::Error;

use clipseq_core::ClipSeqError;

/// Error type for clipseq-io operations.
#[derive(Error, Debug)]
pub enum ReadsIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A BED line could not be turned into a read.
    #[error("Malformed BED line {line}: {message}")]
    MalformedBed { line: usize, message: String },

    #[error(transparent)]
    Core(#[from] ClipSeqError),
}

/// Result type alias for clipseq-io operations.
pub type Result<T> = std::result::Result<T, ReadsIoError>;
