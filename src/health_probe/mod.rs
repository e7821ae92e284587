//! HealthProbe - generic reachability checks
//!
//! ## Responsibilities
//!
//! - ICMP ping via the system ping utility
//! - HTTP reachability with status code and elapsed time
//!
//! Unrelated to stream lifecycle; the registry never consults this.

use crate::error::{Error, Result};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Ping result
#[derive(Debug, Clone, Serialize)]
pub struct PingReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt_ms: Option<f64>,
}

/// HTTP check result
#[derive(Debug, Clone, Serialize)]
pub struct HttpReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// HealthProbe instance
pub struct HealthProbe {
    client: reqwest::Client,
}

impl HealthProbe {
    /// Create new probe
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Ping a host once via the system ping utility
    pub async fn ping(&self, host: &str) -> Result<PingReport> {
        validate_host(host)?;

        let output = Command::new("ping")
            .args(["-c", "1", "-W", "1", host])
            .output()
            .await
            .map_err(|e| Error::Spawn(format!("ping command not available: {e}")))?;

        let ok = output.status.success();
        let rtt_ms = if ok {
            parse_rtt(&String::from_utf8_lossy(&output.stdout))
        } else {
            None
        };

        Ok(PingReport { ok, rtt_ms })
    }

    /// GET a URL and report reachability; transport errors are in-band
    pub async fn http_check(&self, url: &str) -> HttpReport {
        let started = Instant::now();

        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                HttpReport {
                    ok: status < 400,
                    status_code: Some(status),
                    elapsed_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
                    error: None,
                }
            }
            Err(e) => HttpReport {
                ok: false,
                status_code: None,
                elapsed_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl Default for HealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject anything that is not a plain hostname or address.
/// The value is passed to a subprocess, so no shell metacharacters.
fn validate_host(host: &str) -> Result<()> {
    let ok = !host.is_empty()
        && host.len() <= 253
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'));
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(format!("invalid host: {host}")))
    }
}

/// Extract the RTT from a 'time=XX ms' fragment of ping output
fn parse_rtt(stdout: &str) -> Option<f64> {
    for line in stdout.lines() {
        if let Some(idx) = line.find("time=") {
            return line[idx + 5..]
                .split_whitespace()
                .next()
                .and_then(|v| v.parse().ok());
        }
    }
    None
}
