//! Dense per-chromosome occupancy maps and the library statistics built on them.
//!
//! Every analysis here processes one chromosome at a time on the rayon pool.
//! Each worker allocates its own maps, returns a partial result and drops the
//! maps; the partials are then merged.
//!
//! ```rust,ignore
//! use clipseq_occupancy::coverage::genome_coverage;
//!
//! let rows = genome_coverage(&reads, &chrom_sizes)?;
//! ```

pub mod coverage;
pub mod density;
pub mod map;
pub mod overlap;

// re-exports
pub use coverage::{CoverageRow, genome_coverage};
pub use density::{DensityConfig, DensityProfile, DensityRow, relative_density};
pub use map::{CoverageMap, DensityMap, OccupancyMap, StrandPair};
pub use overlap::{OverlapStats, overlap_stats};
