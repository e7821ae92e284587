//! ConfigStore Service
//!
//! Business logic layer: validation, id assignment, uniqueness.

use super::repository::ConfigRepository;
use super::types::*;
use crate::error::Result;
use tokio::sync::Mutex;

/// ConfigStore service for business logic
pub struct ConfigService {
    repo: ConfigRepository,
    /// Serializes load-modify-save cycles; concurrent mutations would
    /// otherwise race on the shared temp file and lose updates
    write_lock: Mutex<()>,
}

impl ConfigService {
    /// Create new service
    pub fn new(repo: ConfigRepository) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    // ========================================
    // Stream Operations
    // ========================================

    /// List all stream definitions
    pub async fn list_streams(&self) -> Result<Vec<StreamDefinition>> {
        self.repo.load_streams().await
    }

    /// Get stream definition by ID
    pub async fn get_stream(&self, stream_id: &str) -> Result<Option<StreamDefinition>> {
        let streams = self.repo.load_streams().await?;
        Ok(streams.into_iter().find(|s| s.id == stream_id))
    }

    /// Create stream with a fresh server-assigned id
    pub async fn create_stream(&self, req: CreateStreamRequest) -> Result<StreamDefinition> {
        validate_request(&req)?;

        let _guard = self.write_lock.lock().await;
        let mut streams = self.repo.load_streams().await?;

        // Timestamp-seeded id; bump on the (rare) same-millisecond collision
        let mut millis = chrono::Utc::now().timestamp_millis();
        let id = loop {
            let candidate = format!("s-{millis}");
            if !streams.iter().any(|s| s.id == candidate) {
                break candidate;
            }
            millis += 1;
        };

        let stream = req.into_definition(id);
        streams.push(stream.clone());
        self.repo.save_streams(&streams).await?;

        tracing::info!(stream_id = %stream.id, name = %stream.name, "Stream created");
        Ok(stream)
    }

    /// Replace stream definition, preserving its id
    pub async fn update_stream(
        &self,
        stream_id: &str,
        req: CreateStreamRequest,
    ) -> Result<StreamDefinition> {
        validate_request(&req)?;

        let _guard = self.write_lock.lock().await;
        let mut streams = self.repo.load_streams().await?;
        let Some(idx) = streams.iter().position(|s| s.id == stream_id) else {
            return Err(crate::Error::NotFound(format!(
                "Stream {stream_id} not found"
            )));
        };

        let stream = req.into_definition(stream_id.to_string());
        streams[idx] = stream.clone();
        self.repo.save_streams(&streams).await?;

        tracing::info!(stream_id = %stream_id, "Stream updated");
        Ok(stream)
    }

    /// Delete stream
    pub async fn delete_stream(&self, stream_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut streams = self.repo.load_streams().await?;
        let before = streams.len();
        streams.retain(|s| s.id != stream_id);

        if streams.len() == before {
            return Err(crate::Error::NotFound(format!(
                "Stream {stream_id} not found"
            )));
        }

        self.repo.save_streams(&streams).await?;
        tracing::info!(stream_id = %stream_id, "Stream deleted");
        Ok(())
    }

    // ========================================
    // Device Operations
    // ========================================

    /// List all device records
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        self.repo.load_devices().await
    }
}

fn validate_request(req: &CreateStreamRequest) -> Result<()> {
    if req.name.trim().is_empty() {
        return Err(crate::Error::Validation("name must not be empty".to_string()));
    }
    if req.url.trim().is_empty() {
        return Err(crate::Error::Validation("url must not be empty".to_string()));
    }
    Ok(())
}
