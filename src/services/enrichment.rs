use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::{AppError, AppResult},
    models::EnrichedMovie,
    services::providers::MetadataProvider,
};

/// Fetches metadata for every id, returning records in input order.
///
/// At most `concurrency` fetches run at once. The batch is all-or-nothing: the first
/// failure aborts the fetches still pending and is returned as-is. The fetches are owned
/// by a `JoinSet`, so dropping the returned future (client gone, caller timeout) aborts
/// them too.
pub async fn enrich(
    provider: Arc<dyn MetadataProvider>,
    movie_ids: &[i64],
    concurrency: usize,
) -> AppResult<Vec<EnrichedMovie>> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, &movie_id) in movie_ids.iter().enumerate() {
        let provider = provider.clone();
        let permits = permits.clone();
        tasks.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => provider.fetch_movie(movie_id).await,
                Err(e) => Err(AppError::Internal(e.to_string())),
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<EnrichedMovie>> = vec![None; movie_ids.len()];
    let mut fetched = 0;

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok((index, Ok(movie))) => {
                slots[index] = Some(movie);
                fetched += 1;
                continue;
            }
            Ok((_, Err(e))) => e,
            Err(e) => AppError::Internal(e.to_string()),
        };

        tasks.abort_all();
        tracing::error!(
            error = %outcome,
            provider = provider.name(),
            fetched,
            requested = movie_ids.len(),
            "Enrichment batch aborted"
        );
        return Err(outcome);
    }

    Ok(slots.into_iter().flatten().collect())
}
