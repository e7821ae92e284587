//! ConfigStore Repository
//!
//! YAML file access layer. Each file holds an ordered sequence of records
//! and is consumed whole and rewritten whole on every mutation.

use super::types::*;
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// ConfigStore repository for YAML file operations
#[derive(Clone)]
pub struct ConfigRepository {
    config_dir: PathBuf,
}

impl ConfigRepository {
    /// Create new repository rooted at the given config directory
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    fn streams_path(&self) -> PathBuf {
        self.config_dir.join("streams.yaml")
    }

    fn devices_path(&self) -> PathBuf {
        self.config_dir.join("devices.yaml")
    }

    /// Create the config directory and seed missing files with empty lists
    pub async fn ensure_files(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir).await?;

        for path in [self.streams_path(), self.devices_path()] {
            if !path.exists() {
                fs::write(&path, "[]\n").await?;
                tracing::info!(path = %path.display(), "Seeded empty config file");
            }
        }

        Ok(())
    }

    /// Get all stream definitions
    pub async fn load_streams(&self) -> Result<Vec<StreamDefinition>> {
        read_yaml_list(&self.streams_path()).await
    }

    /// Rewrite the whole stream list
    pub async fn save_streams(&self, streams: &[StreamDefinition]) -> Result<()> {
        write_yaml_list(&self.streams_path(), streams).await
    }

    /// Get all device records
    pub async fn load_devices(&self) -> Result<Vec<Device>> {
        read_yaml_list(&self.devices_path()).await
    }
}

/// Read a YAML sequence; a missing or empty file reads as an empty list
async fn read_yaml_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path).await?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(serde_yaml::from_str(&raw)?)
}

/// Rewrite a YAML sequence atomically (temp file + rename)
async fn write_yaml_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let raw = serde_yaml::to_string(items)?;
    let tmp = path.with_extension("yaml.tmp");

    fs::write(&tmp, raw).await?;
    fs::rename(&tmp, path).await?;

    Ok(())
}
