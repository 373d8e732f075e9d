pub mod enrichment;
pub mod neighbors;
pub mod providers;
pub mod recommendations;

pub use neighbors::NeighborSelector;
pub use providers::{MetadataProvider, TmdbProvider};
