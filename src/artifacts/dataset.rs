use std::path::Path;

use crate::{error::ArtifactError, models::Movie};

/// Reads the movie dataset CSV.
///
/// Columns are matched by header name; anything besides `movie_id` and `title` is ignored.
/// Row order is preserved since it mirrors the similarity matrix.
pub fn load_movies(path: &Path) -> Result<Vec<Movie>, ArtifactError> {
    let path_display = path.display().to_string();
    let csv_error = |source| ArtifactError::Csv {
        path: path_display.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;

    let movies = reader
        .deserialize::<Movie>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    if movies.is_empty() {
        return Err(ArtifactError::Empty { path: path_display });
    }

    tracing::debug!(path = %path_display, rows = movies.len(), "Loaded movie dataset");

    Ok(movies)
}
