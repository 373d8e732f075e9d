use std::path::{Path, PathBuf};

use reqwest::Client as HttpClient;
use tokio::io::AsyncWriteExt;

use crate::error::ArtifactError;

/// Makes sure `path` exists locally, fetching it from `url` on first run.
///
/// The body is written to a `.part` sibling and renamed into place, so an interrupted
/// download never leaves a truncated artifact behind.
pub async fn ensure_present(
    client: &HttpClient,
    url: Option<&str>,
    path: &Path,
) -> Result<(), ArtifactError> {
    if tokio::fs::try_exists(path).await.map_err(|source| io(path, source))? {
        return Ok(());
    }

    let url = url.ok_or_else(|| ArtifactError::Missing {
        path: path.display().to_string(),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| io(parent, source))?;
    }

    tracing::info!(url = %url, path = %path.display(), "Downloading missing artifact");

    let download_error = |reason: String| ArtifactError::Download {
        url: url.to_string(),
        reason,
    };

    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_error(format!("status {}", response.status())));
    }

    let partial = partial_path(path);
    let mut file = tokio::fs::File::create(&partial)
        .await
        .map_err(|source| io(&partial, source))?;

    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| download_error(e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|source| io(&partial, source))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|source| io(&partial, source))?;
    drop(file);

    tokio::fs::rename(&partial, path)
        .await
        .map_err(|source| io(path, source))?;

    tracing::info!(path = %path.display(), bytes = written, "Artifact downloaded");

    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

fn io(path: &Path, source: std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        source,
    }
}
