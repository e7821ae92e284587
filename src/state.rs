//! Application state
//!
//! Holds all shared components and configuration

use crate::config_store::StreamStore;
use crate::health_probe::HealthProbe;
use crate::registry::{RestartPolicy, StreamRegistry};
use crate::supervisor::RelayCommand;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Config directory (streams.yaml, devices.yaml)
    pub config_dir: PathBuf,
    /// Relay invocation template
    pub relay_command: RelayCommand,
    /// Graceful stop bound before SIGKILL escalation
    pub stop_timeout: Duration,
    /// Auto-restart policy for crashed relays
    pub restart_policy: RestartPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let relay_command = {
            let mut cmd = RelayCommand::default();
            if let Ok(bin) = std::env::var("RELAY_BIN") {
                cmd.bin = bin;
            }
            if let Ok(args) = std::env::var("RELAY_ARGS") {
                cmd.args = args.split_whitespace().map(String::from).collect();
            }
            cmd
        };

        let restart_policy = RestartPolicy {
            max_retries: env_parse("RELAY_RESTART_MAX_RETRIES", 0u32),
            base_delay: Duration::from_millis(env_parse("RELAY_RESTART_BASE_DELAY_MS", 500)),
            max_delay: Duration::from_millis(env_parse("RELAY_RESTART_MAX_DELAY_MS", 30_000)),
        };

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            config_dir: std::env::var("CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config")),
            relay_command,
            stop_timeout: Duration::from_secs(env_parse("STOP_TIMEOUT_SEC", 10)),
            restart_policy,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// ConfigStore (SSoT for stream/device definitions)
    pub store: Arc<StreamStore>,
    /// StreamRegistry (lifecycle state + supervised relays)
    pub registry: StreamRegistry,
    /// HealthProbe (ping/HTTP reachability)
    pub monitor: Arc<HealthProbe>,
    /// Process start time for uptime reporting
    pub started_at: Instant,
}
