use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A row of the movie dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
}

/// Projection served by `GET /movies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    pub movie_id: i64,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            movie_id: movie.movie_id,
        }
    }
}

/// A recommended movie with metadata attached, returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    pub id: i64,
    pub title: Option<String>,
    pub poster_url: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genres: Vec<String>,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from TMDB `GET /movie/{id}`, restricted to the fields we use
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl TmdbMovieDetails {
    /// Builds the client record, joining `image_base` with the relative poster path.
    ///
    /// A missing or empty poster path is rejected rather than producing a broken URL.
    pub fn into_enriched(self, image_base: &str) -> Result<EnrichedMovie, AppError> {
        let poster_path = self
            .poster_path
            .filter(|path| !path.is_empty())
            .ok_or_else(|| {
                AppError::MalformedUpstream(format!("movie {} has no poster_path", self.id))
            })?;

        Ok(EnrichedMovie {
            id: self.id,
            title: self.title,
            poster_url: format!("{}{}", image_base, poster_path),
            overview: self.overview,
            release_date: self.release_date,
            vote_average: self.vote_average,
            genres: self.genres.into_iter().filter_map(|genre| genre.name).collect(),
        })
    }
}
