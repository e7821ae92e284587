//! ConfigStore - Single Source of Truth for stream and device definitions
//!
//! ## Responsibilities
//!
//! - Stream definition CRUD (streams.yaml)
//! - Device inventory (devices.yaml)
//! - Whole-file persistence: each mutation rewrites the file
//!
//! ## Design Principles
//!
//! - SSoT: all definition reads/writes go through here
//! - The registry resolves ids against this store, never its own copy

mod repository;
mod service;
mod types;

pub use repository::ConfigRepository;
pub use service::ConfigService;
pub use types::*;

use std::path::PathBuf;
use tokio::sync::RwLock;

/// ConfigStore instance
pub struct StreamStore {
    service: ConfigService,
    /// In-memory cache for frequent reads
    cache: RwLock<Vec<StreamDefinition>>,
}

impl StreamStore {
    /// Create new store, seeding config files as needed
    pub async fn new(config_dir: PathBuf) -> crate::Result<Self> {
        let repo = ConfigRepository::new(config_dir);
        repo.ensure_files().await?;
        let service = ConfigService::new(repo);

        let store = Self {
            service,
            cache: RwLock::new(Vec::new()),
        };

        store.refresh_cache().await?;
        Ok(store)
    }

    /// Get service reference
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// Refresh in-memory cache from disk
    pub async fn refresh_cache(&self) -> crate::Result<()> {
        let streams = self.service.list_streams().await?;
        let mut cache = self.cache.write().await;
        tracing::debug!(count = streams.len(), "Stream cache refreshed");
        *cache = streams;
        Ok(())
    }

    /// Get cached stream definitions (fast read)
    pub async fn get_cached_streams(&self) -> Vec<StreamDefinition> {
        self.cache.read().await.clone()
    }

    /// Get stream definition by id (reads through to disk)
    pub async fn get_stream(&self, stream_id: &str) -> crate::Result<Option<StreamDefinition>> {
        self.service.get_stream(stream_id).await
    }
}
