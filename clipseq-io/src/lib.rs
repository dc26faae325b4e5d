//! # Input/Output for clipseq.
//!
//! Reads come in as BED6 files (optionally gzipped), result tables go out as
//! tab separated files with a header row. Undefined values are written `NA`.
//!
pub mod bed;
pub mod error;
pub mod table;

// re-expose core functions
pub use bed::*;
pub use error::*;
pub use table::*;
