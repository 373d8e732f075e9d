use std::{fs::File, io::BufReader, path::Path};

use crate::error::ArtifactError;

/// Square pairwise similarity table, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from rows, rejecting anything that is not square
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, ArtifactError> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);

        for (row, scores) in rows.into_iter().enumerate() {
            if scores.len() != size {
                return Err(ArtifactError::NotSquare {
                    row,
                    found: scores.len(),
                    expected: size,
                });
            }
            values.extend(scores);
        }

        Ok(Self { size, values })
    }

    /// Loads a matrix from disk: `.json` as an array of arrays, anything else as headerless CSV
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let rows = if is_json {
            Self::read_json(path)?
        } else {
            Self::read_csv(path)?
        };

        if rows.is_empty() {
            return Err(ArtifactError::Empty {
                path: path.display().to_string(),
            });
        }

        Self::from_rows(rows)
    }

    fn read_json(path: &Path) -> Result<Vec<Vec<f32>>, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    fn read_csv(path: &Path) -> Result<Vec<Vec<f32>>, ArtifactError> {
        let csv_error = |source| ArtifactError::Csv {
            path: path.display().to_string(),
            source,
        };

        // Ragged rows are reported as NotSquare by from_rows, not as a parse error.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        reader
            .deserialize::<Vec<f32>>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_error)
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Scores of `index` against every other row, if the row exists
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        self.values.get(start..start + self.size)
    }
}
