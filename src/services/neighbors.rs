use crate::{
    artifacts::ArtifactStore,
    error::{AppError, AppResult},
};

/// Default neighbour count; the queried movie itself occupies the first slot
pub const DEFAULT_NEIGHBOR_COUNT: usize = 21;

/// Picks the nearest neighbours of a movie from the precomputed similarity matrix
#[derive(Debug, Clone, Copy)]
pub struct NeighborSelector {
    count: usize,
}

impl Default for NeighborSelector {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBOR_COUNT)
    }
}

impl NeighborSelector {
    /// `count` is raised to at least one
    pub fn new(count: usize) -> Self {
        Self {
            count: count.max(1),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns up to `count` movie ids ordered by descending similarity to `movie_id`.
    ///
    /// Ties keep dataset row order. The queried movie is included, normally first.
    pub fn select(&self, store: &ArtifactStore, movie_id: i64) -> AppResult<Vec<i64>> {
        let row = store
            .position_of(movie_id)
            .ok_or(AppError::NotFound(movie_id))?;

        let scores = store
            .similarity()
            .row(row)
            .ok_or(AppError::Unresolvable(movie_id))?;

        let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        // sort_by is stable, so equal scores stay in row order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(self.count)
            .map(|(index, _)| {
                store
                    .movie_at(index)
                    .map(|movie| movie.movie_id)
                    .ok_or(AppError::Unresolvable(movie_id))
            })
            .collect()
    }
}
