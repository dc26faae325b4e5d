//! Core models for clipseq.
//!
//! - [`models`]: genomic intervals, reads, spliced features and transcripts
//! - [`reads`]: the [`ReadsCollection`] contract and the in-memory [`ReadStore`]
//! - [`filter`] / [`config`]: typed read predicates and their TOML form
//! - [`utils`]: chromosome sizes and file readers

pub mod config;
pub mod errors;
pub mod filter;
pub mod models;
pub mod reads;
pub mod utils;

// re-exports
pub use errors::{ClipSeqError, Result};
pub use reads::{ReadQuery, ReadStore, ReadsCollection};
pub use utils::ChromSizes;
