pub mod feature;
pub mod interval;
pub mod read;
pub mod transcript;

// re-export for cleaner imports
pub use self::feature::SplicedFeature;
pub use self::interval::{GenomicInterval, Strand};
pub use self::read::Read;
pub use self::transcript::Transcript;
