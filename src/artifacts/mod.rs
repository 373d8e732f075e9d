//! Static artifacts produced by the offline pipeline.
//!
//! The store is built once at startup and shared read-only between requests. Row `i` of the
//! dataset and row `i` of the similarity matrix describe the same movie; this is checked at
//! construction instead of trusted.
use std::{collections::HashMap, path::PathBuf};

use reqwest::Client as HttpClient;

use crate::{config::Config, error::ArtifactError, models::Movie};

pub mod dataset;
pub mod download;
pub mod similarity;
pub mod vectorizer;

pub use similarity::SimilarityMatrix;
pub use vectorizer::VectorizerModel;

/// Where an artifact lives locally and, optionally, where to fetch it from
#[derive(Debug, Clone)]
pub struct ArtifactSource {
    pub path: PathBuf,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArtifactSources {
    pub dataset: ArtifactSource,
    pub similarity: ArtifactSource,
    pub vectorizer: ArtifactSource,
}

impl ArtifactSources {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dataset: ArtifactSource {
                path: config.dataset_path(),
                url: config.dataset_url.clone(),
            },
            similarity: ArtifactSource {
                path: config.similarity_path(),
                url: config.similarity_url.clone(),
            },
            vectorizer: ArtifactSource {
                path: config.vectorizer_path(),
                url: config.vectorizer_url.clone(),
            },
        }
    }

    /// Downloads any artifact missing locally, in order
    pub async fn fetch_missing(&self, client: &HttpClient) -> Result<(), ArtifactError> {
        for source in [&self.vectorizer, &self.similarity, &self.dataset] {
            download::ensure_present(client, source.url.as_deref(), &source.path).await?;
        }
        Ok(())
    }
}

/// In-memory dataset, similarity matrix and vectorizer
#[derive(Debug)]
pub struct ArtifactStore {
    movies: Vec<Movie>,
    /// movie_id -> first row holding it
    positions: HashMap<i64, usize>,
    similarity: SimilarityMatrix,
    vectorizer: VectorizerModel,
}

impl ArtifactStore {
    /// Assembles a store, rejecting a matrix that does not line up with the dataset
    pub fn new(
        movies: Vec<Movie>,
        similarity: SimilarityMatrix,
        vectorizer: VectorizerModel,
    ) -> Result<Self, ArtifactError> {
        if movies.len() != similarity.size() {
            return Err(ArtifactError::Misaligned {
                movies: movies.len(),
                matrix_rows: similarity.size(),
            });
        }

        Ok(Self::assemble(movies, similarity, vectorizer))
    }

    fn assemble(
        movies: Vec<Movie>,
        similarity: SimilarityMatrix,
        vectorizer: VectorizerModel,
    ) -> Self {
        let mut positions = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            positions.entry(movie.movie_id).or_insert(row);
        }

        Self {
            movies,
            positions,
            similarity,
            vectorizer,
        }
    }

    /// Skips the alignment check so lookup failures past the dataset can be exercised
    #[cfg(test)]
    pub(crate) fn new_unchecked(
        movies: Vec<Movie>,
        similarity: SimilarityMatrix,
        vectorizer: VectorizerModel,
    ) -> Self {
        Self::assemble(movies, similarity, vectorizer)
    }

    /// Loads all three artifacts from their local paths
    pub fn load(sources: &ArtifactSources) -> Result<Self, ArtifactError> {
        let movies = dataset::load_movies(&sources.dataset.path)?;
        let vectorizer = VectorizerModel::load(&sources.vectorizer.path)?;
        let similarity = SimilarityMatrix::load(&sources.similarity.path)?;

        let store = Self::new(movies, similarity, vectorizer)?;

        tracing::info!(
            movies = store.movies.len(),
            distinct_ids = store.positions.len(),
            matrix_size = store.similarity.size(),
            vectorizer_bytes = store.vectorizer.len(),
            "Artifacts loaded"
        );

        Ok(store)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn contains(&self, movie_id: i64) -> bool {
        self.positions.contains_key(&movie_id)
    }

    /// Row index of the first dataset row with this id
    pub fn position_of(&self, movie_id: i64) -> Option<usize> {
        self.positions.get(&movie_id).copied()
    }

    pub fn movie_at(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn vectorizer(&self) -> &VectorizerModel {
        &self.vectorizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(movie_id: i64, title: &str) -> Movie {
        Movie {
            movie_id,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_new_rejects_row_count_mismatch() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.2, 1.0]]).unwrap();
        let err = ArtifactStore::new(
            vec![movie(1, "A"), movie(2, "B"), movie(3, "C")],
            matrix,
            VectorizerModel::from_bytes(vec![1]),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ArtifactError::Misaligned {
                movies: 3,
                matrix_rows: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_row() {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ])
        .unwrap();
        let store = ArtifactStore::new(
            vec![movie(7, "First"), movie(8, "Other"), movie(7, "Duplicate")],
            matrix,
            VectorizerModel::from_bytes(vec![1]),
        )
        .unwrap();

        assert_eq!(store.position_of(7), Some(0));
        assert_eq!(store.position_of(8), Some(1));
        assert!(!store.contains(9));
        assert_eq!(store.movies().len(), 3);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("cleaned_data.csv");
        let similarity = dir.path().join("similarity_matrix.json");
        let vectorizer = dir.path().join("count_vectorizer.bin");
        std::fs::write(&dataset, "movie_id,title\n19995,Avatar\n285,Pirates\n").unwrap();
        std::fs::write(&similarity, "[[1.0, 0.4], [0.4, 1.0]]").unwrap();
        std::fs::write(&vectorizer, [1u8, 2, 3]).unwrap();

        let source = |path: PathBuf| ArtifactSource { path, url: None };
        let sources = ArtifactSources {
            dataset: source(dataset),
            similarity: source(similarity),
            vectorizer: source(vectorizer),
        };

        let store = ArtifactStore::load(&sources).unwrap();
        assert_eq!(store.movies().len(), 2);
        assert_eq!(store.similarity().size(), 2);
        assert_eq!(store.vectorizer().len(), 3);
        assert_eq!(store.movie_at(1).map(|m| m.movie_id), Some(285));
    }
}
