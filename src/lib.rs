//! RTSP Smart IDE server library
//!
//! Stream manager for camera sources: YAML-backed definitions with
//! lifecycle-controlled relay subprocesses.
//!
//! ## Components
//!
//! 1. ConfigStore - SSoT for stream and device definitions (YAML files)
//! 2. StreamRegistry - logical lifecycle state, per-id serialized start/stop
//! 3. RelaySupervisor - relay subprocess ownership and exit notifications
//! 4. HealthProbe - generic ping/HTTP reachability checks
//! 5. WebAPI - REST API endpoints
//!
//! ## Design Principles
//!
//! - SSoT: ConfigStore is the single source of truth for definitions
//! - The supervisor exclusively owns OS process handles; every process is
//!   reaped exactly once
//! - One stream's failure never affects another stream

pub mod config_store;
pub mod error;
pub mod health_probe;
pub mod models;
pub mod registry;
pub mod state;
pub mod supervisor;
pub mod web_api;

pub use error::{Error, Result};
pub use state::AppState;
