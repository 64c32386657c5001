use std::sync::Arc;

use mergebox_core::{CatalogStore, Config, PlaylistStore};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<CatalogStore>,
    playlist: Arc<PlaylistStore>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<CatalogStore>, playlist: Arc<PlaylistStore>) -> Self {
        Self {
            config,
            catalog,
            playlist,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn playlist(&self) -> &PlaylistStore {
        &self.playlist
    }
}
