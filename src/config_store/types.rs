//! ConfigStore data types
//!
//! Persisted records for streams and devices.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stream definition (persisted in streams.yaml)
///
/// The id is assigned at creation and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDefinition {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub protocol: StreamProtocol,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

/// Stream protocol tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamProtocol {
    Rtsp,
    Rtmp,
    Http,
    Other,
}

impl Default for StreamProtocol {
    fn default() -> Self {
        Self::Rtsp
    }
}

impl From<&str> for StreamProtocol {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rtsp" => Self::Rtsp,
            "rtmp" => Self::Rtmp,
            "http" => Self::Http,
            _ => Self::Other,
        }
    }
}

impl StreamProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rtsp => "rtsp",
            Self::Rtmp => "rtmp",
            Self::Http => "http",
            Self::Other => "other",
        }
    }
}

/// Stream create/replace request (id is server-assigned, never accepted here)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStreamRequest {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub protocol: StreamProtocol,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

impl CreateStreamRequest {
    /// Materialize a definition under the given id
    pub fn into_definition(self, id: String) -> StreamDefinition {
        StreamDefinition {
            id,
            name: self.name,
            url: self.url,
            protocol: self.protocol,
            enabled: self.enabled,
            username: self.username,
            password: self.password,
            meta: self.meta,
        }
    }
}

/// Device record (persisted in devices.yaml, read-only through the API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(rename = "type", default = "default_device_type")]
    pub device_type: String,
    pub ip: String,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

fn default_device_type() -> String {
    "camera".to_string()
}
