use std::sync::Arc;

use crate::{
    artifacts::ArtifactStore,
    config::Config,
    services::{MetadataProvider, NeighborSelector},
};

/// Shared application state, built once at startup and never mutated
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub provider: Arc<dyn MetadataProvider>,
    pub selector: NeighborSelector,
    pub enrichment_concurrency: usize,
}

impl AppState {
    pub fn new(store: ArtifactStore, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            store: Arc::new(store),
            provider,
            selector: NeighborSelector::default(),
            enrichment_concurrency: 1,
        }
    }

    /// Applies the tunables from configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.selector = NeighborSelector::new(config.recommendation_count());
        self.enrichment_concurrency = config.enrichment_concurrency();
        self
    }

    pub fn with_enrichment_concurrency(mut self, concurrency: usize) -> Self {
        self.enrichment_concurrency = concurrency.max(1);
        self
    }
}
