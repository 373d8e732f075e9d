use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{EnrichedMovie, MovieSummary},
    services::recommendations,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

/// Greeting, doubles as the health check
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Hello, welcome to movie recommendation system",
    })
}

/// Every movie in the dataset, in dataset order
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<MovieSummary>> {
    Json(state.store.movies().iter().map(MovieSummary::from).collect())
}

/// Movies similar to `movie_id`, enriched with metadata
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<i64>,
) -> AppResult<Json<Vec<EnrichedMovie>>> {
    tracing::info!(
        request_id = %request_id,
        movie_id,
        "Processing recommendation request"
    );

    let movies = recommendations::get_recommendations(
        &state.store,
        state.provider.clone(),
        state.selector,
        state.enrichment_concurrency,
        movie_id,
    )
    .await
    .inspect_err(|e| {
        tracing::warn!(request_id = %request_id, movie_id, error = %e, "Recommendation failed");
    })?;

    tracing::info!(
        request_id = %request_id,
        movie_id,
        count = movies.len(),
        "Recommendations served"
    );

    Ok(Json(movies))
}
