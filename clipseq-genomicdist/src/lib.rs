//! Distribution of CLIP-Seq reads along genomic features.
//!
//! Reads are placed by their midpoint onto a relative, 5'→3' coordinate of a
//! feature and counted into a fixed number of bins:
//!
//! - linear features ([`GenomicInterval`](clipseq_core::models::GenomicInterval))
//!   use the distance to their 5' end
//! - spliced features ([`SplicedFeature`](clipseq_core::models::SplicedFeature))
//!   use exonic coordinates, skipping introns
//!
//! # Example
//!
//! ```rust,ignore
//! use clipseq_genomicdist::{BinningConfig, genic_distribution};
//!
//! let table = genic_distribution(&reads, &transcripts, &BinningConfig::default())?;
//! for row in table.rows() {
//!     println!("{}\t{}\t{:?}", row.category, row.bin, row.mean_count);
//! }
//! ```

pub mod binning;
pub mod config;
pub mod errors;
pub mod genic;
pub mod models;

// re-exports
pub use binning::{BinAccumulator, BinRow, BinTable, PositionalBinner};
pub use config::BinningConfig;
pub use errors::GenomicDistError;
pub use genic::{GenicElement, genic_distribution};
pub use models::PositionalFeature;
