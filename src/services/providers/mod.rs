//! Movie metadata provider abstraction
//!
//! Recommendations carry only dataset ids; a provider turns each id into a full record
//! (poster, overview, genres). TMDB is the only implementation, but handlers and the
//! enrichment fan-out depend on the trait so tests can swap in fakes.
use crate::{error::AppResult, models::EnrichedMovie};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a single movie by its external id
    async fn fetch_movie(&self, movie_id: i64) -> AppResult<EnrichedMovie>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
