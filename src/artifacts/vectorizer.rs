use std::path::Path;

use crate::error::ArtifactError;

/// Serialized text vectorizer produced by the offline pipeline.
///
/// Kept in memory alongside the matrix it was used to build; request handling never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerModel {
    bytes: Vec<u8>,
}

impl VectorizerModel {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(ArtifactError::Empty {
                path: path.display().to_string(),
            });
        }

        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
