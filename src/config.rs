use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key, required
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix joined with the relative poster path returned by TMDB
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for metadata calls, client default when unset
    #[serde(default)]
    pub tmdb_timeout_secs: Option<u64>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the static artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    #[serde(default = "default_dataset_file")]
    pub dataset_file: String,

    #[serde(default = "default_similarity_file")]
    pub similarity_file: String,

    #[serde(default = "default_vectorizer_file")]
    pub vectorizer_file: String,

    /// Remote sources fetched when the local artifact is absent
    #[serde(default)]
    pub dataset_url: Option<String>,
    #[serde(default)]
    pub similarity_url: Option<String>,
    #[serde(default)]
    pub vectorizer_url: Option<String>,

    /// Number of neighbours returned, including the queried movie
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Upper bound on concurrent metadata fetches per request
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,

    /// Allowed cross-origin sources
    #[serde(default)]
    pub development_origin: Option<String>,
    #[serde(default)]
    pub development_home_origin: Option<String>,
    #[serde(default)]
    pub frontend_origin: Option<String>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_dataset_file() -> String {
    "cleaned_data.csv".to_string()
}

fn default_similarity_file() -> String {
    "similarity_matrix.csv".to_string()
}

fn default_vectorizer_file() -> String {
    "count_vectorizer.bin".to_string()
}

fn default_recommendation_count() -> usize {
    21
}

fn default_enrichment_concurrency() -> usize {
    8
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `.env.local` takes precedence over `.env`; both are optional.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: TMDB_API_KEY is empty");
        }

        Ok(config)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.models_dir.join(&self.dataset_file)
    }

    pub fn similarity_path(&self) -> PathBuf {
        self.models_dir.join(&self.similarity_file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.models_dir.join(&self.vectorizer_file)
    }

    /// Neighbour count with a floor of one, so a known movie always returns itself
    pub fn recommendation_count(&self) -> usize {
        self.recommendation_count.max(1)
    }

    /// Concurrency bound with a floor of one (sequential)
    pub fn enrichment_concurrency(&self) -> usize {
        self.enrichment_concurrency.max(1)
    }

    /// The configured CORS origins, in declaration order
    pub fn cors_origins(&self) -> Vec<String> {
        [
            &self.development_origin,
            &self.development_home_origin,
            &self.frontend_origin,
        ]
        .into_iter()
        .flatten()
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_vars(vars(&[("TMDB_API_KEY", "secret")])).unwrap();
        assert_eq!(config.tmdb_api_key, "secret");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_image_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.tmdb_timeout_secs, None);
        assert_eq!(config.recommendation_count, 21);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(
            config.dataset_path(),
            PathBuf::from("models").join("cleaned_data.csv")
        );
        assert!(config.cors_origins().is_empty());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = Config::from_vars(vars(&[("PORT", "9000")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let result = Config::from_vars(vars(&[("TMDB_API_KEY", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_origins_skip_unset_and_blank() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("DEVELOPMENT_ORIGIN", "http://localhost:5173"),
            ("DEVELOPMENT_HOME_ORIGIN", ""),
            ("FRONTEND_ORIGIN", "https://movies.example.com"),
        ]))
        .unwrap();

        assert_eq!(
            config.cors_origins(),
            vec![
                "http://localhost:5173".to_string(),
                "https://movies.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_recommendation_count_floor() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("RECOMMENDATION_COUNT", "0"),
        ]))
        .unwrap();
        assert_eq!(config.recommendation_count(), 1);
    }

    #[test]
    fn test_enrichment_concurrency_floor() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "secret"),
            ("ENRICHMENT_CONCURRENCY", "0"),
        ]))
        .unwrap();
        assert_eq!(config.enrichment_concurrency(), 1);
    }
}
