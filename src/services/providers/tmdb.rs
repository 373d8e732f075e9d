//! TMDB (The Movie Database) metadata provider
//!
//! API Flow:
//! 1. Details: /movie/{id}?api_key=..&language=.. → title, poster path, overview, genres
//! 2. Poster: relative `poster_path` joined onto the configured image base
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{EnrichedMovie, TmdbMovieDetails},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        image_base_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
            language,
        }
    }

    /// Builds a provider with its own client, honouring the optional timeout
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.tmdb_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self::new(
            builder.build()?,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base_url.clone(),
            config.tmdb_language.clone(),
        ))
    }

    fn movie_url(&self, movie_id: i64) -> String {
        format!("{}/movie/{}", self.api_url, movie_id)
    }

    /// The request URL carries the API key; it is logged, never returned to clients
    fn client_error(&self, movie_id: i64, error: reqwest::Error) -> AppError {
        tracing::warn!(
            error = %error,
            movie_id,
            provider = "tmdb",
            "Metadata request failed"
        );
        AppError::HttpClient(error.without_url())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_movie(&self, movie_id: i64) -> AppResult<EnrichedMovie> {
        let response = self
            .http_client
            .get(self.movie_url(movie_id))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.client_error(movie_id, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                movie_id,
                status = %status,
                provider = "tmdb",
                "Metadata fetch failed"
            );
            return Err(AppError::Upstream(format!(
                "TMDB API returned status {} for movie {}: {}",
                status, movie_id, body
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| self.client_error(movie_id, e))?;
        let details: TmdbMovieDetails = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                movie_id,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::MalformedUpstream(format!("Failed to parse TMDB response: {}", e))
        })?;

        let movie = details.into_enriched(&self.image_base_url)?;

        tracing::debug!(
            movie_id,
            genres = movie.genres.len(),
            provider = "tmdb",
            "Metadata fetched"
        );

        Ok(movie)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    /// Stand-in for the TMDB details endpoint
    async fn movie_details(
        Path(movie_id): Path<i64>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        if params.get("api_key").map(String::as_str) != Some("test_key")
            || params.get("language").map(String::as_str) != Some("en-US")
        {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        match movie_id {
            19995 => Json(json!({
                "id": 19995,
                "title": "Avatar",
                "poster_path": "/avatar.jpg",
                "overview": "A paraplegic Marine is dispatched to the moon Pandora.",
                "release_date": "2009-12-15",
                "vote_average": 7.2,
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]
            }))
            .into_response(),
            285 => Json(json!({"id": 285, "title": "Pirates", "poster_path": null}))
                .into_response(),
            503 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            _ => "not json".into_response(),
        }
    }

    async fn spawn_fake_tmdb() -> String {
        let app = Router::new().route("/3/movie/:movie_id", get(movie_details));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/3/", addr)
    }

    fn create_test_provider(api_url: String) -> TmdbProvider {
        TmdbProvider::new(
            HttpClient::new(),
            "test_key".to_string(),
            api_url,
            "https://image.tmdb.org/t/p/w500".to_string(),
            "en-US".to_string(),
        )
    }

    #[test]
    fn test_movie_url_trims_trailing_slash() {
        let provider = create_test_provider("https://api.themoviedb.org/3/".to_string());
        assert_eq!(
            provider.movie_url(19995),
            "https://api.themoviedb.org/3/movie/19995"
        );
    }

    #[tokio::test]
    async fn test_fetch_movie_success() {
        let provider = create_test_provider(spawn_fake_tmdb().await);

        let movie = provider.fetch_movie(19995).await.unwrap();
        assert_eq!(movie.id, 19995);
        assert_eq!(movie.title.as_deref(), Some("Avatar"));
        assert_eq!(movie.poster_url, "https://image.tmdb.org/t/p/w500/avatar.jpg");
        assert_eq!(movie.release_date.as_deref(), Some("2009-12-15"));
        assert_eq!(movie.vote_average, Some(7.2));
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
    }

    #[tokio::test]
    async fn test_fetch_movie_upstream_status() {
        let provider = create_test_provider(spawn_fake_tmdb().await);

        let err = provider.fetch_movie(503).await.unwrap_err();
        match err {
            AppError::Upstream(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_movie_missing_poster() {
        let provider = create_test_provider(spawn_fake_tmdb().await);

        let err = provider.fetch_movie(285).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedUpstream(_)));
    }

    #[tokio::test]
    async fn test_fetch_movie_invalid_body() {
        let provider = create_test_provider(spawn_fake_tmdb().await);

        let err = provider.fetch_movie(42).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedUpstream(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = TmdbProvider::new(
            HttpClient::new(),
            "SUPERSECRETKEY".to_string(),
            format!("http://{}/3", addr),
            "https://image.tmdb.org/t/p/w500".to_string(),
            "en-US".to_string(),
        );

        let err = provider.fetch_movie(19995).await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
        assert!(!err.to_string().contains("SUPERSECRETKEY"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Error generating recommendations"));
        assert!(!body.contains("SUPERSECRETKEY"));
        assert!(!body.contains("api_key"));
    }

    #[tokio::test]
    async fn test_wrong_api_key_is_upstream_error() {
        let base = spawn_fake_tmdb().await;
        let provider = TmdbProvider::new(
            HttpClient::new(),
            "wrong".to_string(),
            base,
            String::new(),
            "en-US".to_string(),
        );

        let err = provider.fetch_movie(19995).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
