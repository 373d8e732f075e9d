use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request-time errors surfaced by the recommendation endpoints
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Movie ID {0} not found in our database")]
    NotFound(i64),

    #[error("Movie ID {0} exists but cannot generate recommendations for it")]
    Unresolvable(i64),

    #[error("Metadata API error: {0}")]
    Upstream(String),

    #[error("Malformed metadata response: {0}")]
    MalformedUpstream(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(_) | AppError::Unresolvable(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::Upstream(_)
            | AppError::MalformedUpstream(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error generating recommendations: {}", self),
            ),
        };

        let body = Json(json!({
            "detail": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Errors raised while fetching or loading the static artifacts at startup
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV artifact {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse JSON artifact {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact {path} is missing and no download URL is configured")]
    Missing { path: String },

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Artifact {path} is empty")]
    Empty { path: String },

    #[error("Similarity matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Dataset has {movies} rows but similarity matrix has {matrix_rows}")]
    Misaligned { movies: usize, matrix_rows: usize },
}
