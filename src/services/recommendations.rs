use std::sync::Arc;

use crate::{
    artifacts::ArtifactStore,
    error::AppResult,
    models::EnrichedMovie,
    services::{enrichment, neighbors::NeighborSelector, providers::MetadataProvider},
};

/// Recommends movies similar to `movie_id`
///
/// Nearest neighbours come from the similarity matrix (the movie itself included, first),
/// then each is enriched through the metadata provider. Fails as a whole if any
/// neighbour cannot be enriched.
pub async fn get_recommendations(
    store: &ArtifactStore,
    provider: Arc<dyn MetadataProvider>,
    selector: NeighborSelector,
    concurrency: usize,
    movie_id: i64,
) -> AppResult<Vec<EnrichedMovie>> {
    let neighbors = selector.select(store, movie_id)?;

    tracing::debug!(
        movie_id,
        neighbors = neighbors.len(),
        "Selected nearest neighbours"
    );

    enrichment::enrich(provider, &neighbors, concurrency).await
}
