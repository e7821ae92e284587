//! StreamRegistry - logical stream lifecycle state
//!
//! ## Responsibilities
//!
//! - Reconcile desired state (ConfigStore) against actual state (supervisor)
//! - Serialize start/stop per stream id; a second concurrent request on the
//!   same id fails fast with Conflict instead of queuing
//! - Keep runtime snapshots in a separate map so status/list reads never
//!   wait behind an in-flight start/stop
//! - Crash handling: the exit watcher acquires the same per-id lock before
//!   mutating, and optionally schedules an exponential-backoff restart
//!
//! State machine per id:
//! `stopped -> starting -> running -> stopping -> stopped`, with
//! `starting|running -> crashed` on unexpected exit and
//! `crashed -> starting` on manual or automatic retry.

use crate::config_store::{StreamDefinition, StreamStore};
use crate::error::{Error, Result};
use crate::supervisor::{ProcessEvent, RelayHandle, RelaySupervisor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard, RwLock};

/// Stream lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamStatus {
    Stopped,
    Starting,
    Running,
    Stopping,
    Crashed,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Crashed => "crashed",
        }
    }
}

/// Read-only runtime snapshot for one stream id
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeSnapshot {
    pub stream_id: String,
    pub status: StreamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub restart_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_exit_reason: Option<String>,
}

/// Auto-restart policy for crashed relays
///
/// Delay grows as `base_delay * 2^attempt`, capped at `max_delay`.
/// `max_retries = 0` disables auto-restart entirely.
#[derive(Debug, Clone)]
pub struct RestartPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RestartPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Internal per-id runtime entry
#[derive(Debug)]
struct RuntimeEntry {
    status: StreamStatus,
    pid: Option<u32>,
    started_at: Option<DateTime<Utc>>,
    restart_count: u32,
    last_exit_code: Option<i32>,
    last_exit_reason: Option<String>,
    /// Bumped on every spawn and explicit stop; invalidates stale exit
    /// watchers and pending backoff timers
    epoch: u64,
}

impl Default for RuntimeEntry {
    fn default() -> Self {
        Self {
            status: StreamStatus::Stopped,
            pid: None,
            started_at: None,
            restart_count: 0,
            last_exit_code: None,
            last_exit_reason: None,
            epoch: 0,
        }
    }
}

struct Inner {
    store: Arc<StreamStore>,
    supervisor: RelaySupervisor,
    stop_timeout: Duration,
    restart: RestartPolicy,
    /// Per-id operation locks (serialize start/stop/crash transitions)
    ops: RwLock<HashMap<String, Arc<Mutex<()>>>>,
    /// Runtime state, readable without touching the operation locks
    states: RwLock<HashMap<String, RuntimeEntry>>,
    /// Live handles, accessed only while holding the per-id operation lock
    handles: Mutex<HashMap<String, RelayHandle>>,
}

/// StreamRegistry instance (cheap to clone)
#[derive(Clone)]
pub struct StreamRegistry {
    inner: Arc<Inner>,
}

impl StreamRegistry {
    /// Create new registry
    pub fn new(
        store: Arc<StreamStore>,
        supervisor: RelaySupervisor,
        stop_timeout: Duration,
        restart: RestartPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                supervisor,
                stop_timeout,
                restart,
                ops: RwLock::new(HashMap::new()),
                states: RwLock::new(HashMap::new()),
                handles: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn supervisor(&self) -> &RelaySupervisor {
        &self.inner.supervisor
    }

    // ========================================
    // Public operations
    // ========================================

    /// Start the relay for a stream id
    pub async fn start(&self, stream_id: &str) -> Result<RuntimeSnapshot> {
        let def = self.resolve(stream_id).await?;
        if !def.enabled {
            return Err(Error::Validation(format!(
                "Stream {stream_id} is disabled"
            )));
        }

        let guard = self.try_op_lock(stream_id).await?;
        self.start_locked(&def, guard, true).await
    }

    /// Stop the relay for a stream id (idempotent when already stopped)
    pub async fn stop(&self, stream_id: &str) -> Result<RuntimeSnapshot> {
        self.resolve(stream_id).await?;
        let guard = self.try_op_lock(stream_id).await?;
        self.stop_locked(stream_id, guard).await
    }

    /// Runtime snapshot for a stream id; never blocks on subprocess I/O
    pub async fn status(&self, stream_id: &str) -> Result<RuntimeSnapshot> {
        self.resolve(stream_id).await?;
        Ok(self.snapshot(stream_id).await)
    }

    /// Runtime snapshots for all known stream definitions
    pub async fn list(&self) -> Vec<RuntimeSnapshot> {
        let defs = self.inner.store.get_cached_streams().await;
        let states = self.inner.states.read().await;

        defs.iter()
            .map(|def| match states.get(&def.id) {
                Some(entry) => snapshot_from(&def.id, entry),
                None => snapshot_from(&def.id, &RuntimeEntry::default()),
            })
            .collect()
    }

    /// Drop runtime tracking for a deleted stream id
    pub async fn forget(&self, stream_id: &str) {
        self.inner.states.write().await.remove(stream_id);
        self.inner.ops.write().await.remove(stream_id);
        self.inner.handles.lock().await.remove(stream_id);
    }

    /// Stop every active relay (graceful shutdown path)
    pub async fn shutdown_all(&self) {
        let active: Vec<String> = {
            let states = self.inner.states.read().await;
            states
                .iter()
                .filter(|(_, e)| {
                    matches!(
                        e.status,
                        StreamStatus::Running | StreamStatus::Starting | StreamStatus::Stopping
                    )
                })
                .map(|(id, _)| id.clone())
                .collect()
        };

        for stream_id in active {
            let lock = self.op_lock(&stream_id).await;
            // Shutdown waits for in-flight operations instead of failing fast
            let guard = lock.lock_owned().await;
            if let Err(e) = self.stop_locked(&stream_id, guard).await {
                tracing::error!(stream_id = %stream_id, error = %e, "Failed to stop relay during shutdown");
            }
        }
    }

    // ========================================
    // Locked transitions
    // ========================================

    // Boxed return type: start -> exit watcher -> auto-restart -> start is
    // a recursive async cycle, and the spawned watcher future must be Send
    fn start_locked<'a>(
        &'a self,
        def: &'a StreamDefinition,
        guard: OwnedMutexGuard<()>,
        manual: bool,
    ) -> Pin<Box<dyn Future<Output = Result<RuntimeSnapshot>> + Send + 'a>> {
        Box::pin(async move {
            let stream_id = &def.id;

            {
                let states = self.inner.states.read().await;
                if let Some(entry) = states.get(stream_id) {
                    if matches!(
                        entry.status,
                        StreamStatus::Running | StreamStatus::Starting | StreamStatus::Stopping
                    ) {
                        return Err(Error::Conflict(format!(
                            "Stream {stream_id} is already {}",
                            entry.status.as_str()
                        )));
                    }
                }
            }

            let epoch = self
                .mutate(stream_id, |e| {
                    e.status = StreamStatus::Starting;
                    e.epoch += 1;
                    e.last_exit_code = None;
                    e.last_exit_reason = None;
                    if manual {
                        e.restart_count = 0;
                    }
                    e.epoch
                })
                .await;

            tracing::info!(stream_id = %stream_id, manual = manual, "Starting relay");

            match self.inner.supervisor.spawn(def).await {
                Ok(mut handle) => {
                    let pid = handle.pid();
                    let events = handle.take_events();

                    self.inner
                        .handles
                        .lock()
                        .await
                        .insert(stream_id.clone(), handle);

                    self.mutate(stream_id, |e| {
                        e.status = StreamStatus::Running;
                        e.pid = pid;
                        e.started_at = Some(Utc::now());
                    })
                    .await;

                    if let Some(events) = events {
                        let registry = self.clone();
                        let id = stream_id.clone();
                        tokio::spawn(async move {
                            registry.watch_exit(id, epoch, events).await;
                        });
                    }

                    drop(guard);
                    Ok(self.snapshot(stream_id).await)
                }
                Err(e) => {
                    tracing::error!(stream_id = %stream_id, error = %e, "Relay launch failed");
                    self.mutate(stream_id, |entry| {
                        entry.status = StreamStatus::Crashed;
                        entry.pid = None;
                        entry.last_exit_reason = Some(e.to_string());
                    })
                    .await;
                    Err(e)
                }
            }
        })
    }

    async fn stop_locked(
        &self,
        stream_id: &str,
        guard: OwnedMutexGuard<()>,
    ) -> Result<RuntimeSnapshot> {
        let current = {
            let states = self.inner.states.read().await;
            states
                .get(stream_id)
                .map(|e| e.status)
                .unwrap_or(StreamStatus::Stopped)
        };

        match current {
            StreamStatus::Stopped => Ok(self.snapshot(stream_id).await),
            StreamStatus::Crashed => {
                // Clear the crash; the epoch bump cancels pending auto-restarts
                self.mutate(stream_id, |e| {
                    e.status = StreamStatus::Stopped;
                    e.pid = None;
                    e.started_at = None;
                    e.epoch += 1;
                })
                .await;
                tracing::info!(stream_id = %stream_id, "Crashed stream cleared to stopped");
                Ok(self.snapshot(stream_id).await)
            }
            _ => {
                self.mutate(stream_id, |e| {
                    e.status = StreamStatus::Stopping;
                    e.epoch += 1;
                })
                .await;

                let handle = self.inner.handles.lock().await.remove(stream_id);

                if let Some(mut handle) = handle {
                    tracing::info!(stream_id = %stream_id, pid = ?handle.pid(), "Stopping relay");
                    if let Err(e) = self
                        .inner
                        .supervisor
                        .signal_stop(&mut handle, self.inner.stop_timeout)
                        .await
                    {
                        // Unreapable process: surface the failure, leave crashed
                        self.mutate(stream_id, |entry| {
                            entry.status = StreamStatus::Crashed;
                            entry.last_exit_reason = Some(e.to_string());
                        })
                        .await;
                        return Err(e);
                    }
                } else {
                    tracing::warn!(stream_id = %stream_id, "No live handle for active stream, marking stopped");
                }

                self.mutate(stream_id, |e| {
                    e.status = StreamStatus::Stopped;
                    e.pid = None;
                    e.started_at = None;
                })
                .await;

                drop(guard);
                Ok(self.snapshot(stream_id).await)
            }
        }
    }

    // ========================================
    // Exit watching and auto-restart
    // ========================================

    /// Consume the single terminal event for one spawned process
    ///
    /// Acquires the same per-id lock as start/stop before mutating, so a
    /// crash transition never races an explicit operation. The epoch check
    /// makes the crash transition happen at most once per spawn.
    async fn watch_exit(&self, stream_id: String, epoch: u64, mut events: mpsc::Receiver<ProcessEvent>) {
        let Some(event) = events.recv().await else {
            return;
        };

        let (code, reason) = match event {
            ProcessEvent::Exited(code) => (Some(code), format!("exited with code {code}")),
            ProcessEvent::Crashed(Some(sig)) => (None, format!("killed by signal {sig}")),
            ProcessEvent::Crashed(None) => (None, "terminated abnormally".to_string()),
        };

        let lock = self.op_lock(&stream_id).await;
        let _guard = lock.lock().await;

        let mut schedule_restart = None;
        let crashed = {
            let mut states = self.inner.states.write().await;
            // A missing entry means the stream was forgotten (deleted);
            // do not resurrect it for a late exit
            let Some(e) = states.get_mut(&stream_id) else {
                tracing::debug!(stream_id = %stream_id, reason = %reason, "Relay exit for forgotten stream");
                return;
            };

            e.last_exit_code = code;
            e.last_exit_reason = Some(reason.clone());

            // Only the spawn that produced this event may transition;
            // after an explicit stop (or a newer start) just record the exit
            if e.epoch != epoch
                || !matches!(e.status, StreamStatus::Running | StreamStatus::Starting)
            {
                false
            } else {
                e.status = StreamStatus::Crashed;
                e.pid = None;

                let policy = &self.inner.restart;
                if policy.max_retries > 0 && e.restart_count < policy.max_retries {
                    e.restart_count += 1;
                    schedule_restart = Some((e.restart_count, e.epoch));
                }
                true
            }
        };

        if !crashed {
            tracing::debug!(stream_id = %stream_id, reason = %reason, "Relay exit after requested stop");
            return;
        }

        tracing::warn!(stream_id = %stream_id, reason = %reason, "Relay crashed unexpectedly");
        self.inner.handles.lock().await.remove(&stream_id);

        if let Some((attempt, crash_epoch)) = schedule_restart {
            let delay = self.inner.restart.delay_for(attempt - 1);
            tracing::info!(
                stream_id = %stream_id,
                attempt = attempt,
                delay_ms = delay.as_millis(),
                "Scheduling relay auto-restart"
            );

            let registry = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                registry.try_auto_restart(stream_id, crash_epoch).await;
            });
        }
    }

    /// Backoff timer callback; a no-op if anything changed since the crash
    async fn try_auto_restart(&self, stream_id: String, crash_epoch: u64) {
        let def = match self.inner.store.get_stream(&stream_id).await {
            Ok(Some(def)) if def.enabled => def,
            _ => return,
        };

        let lock = self.op_lock(&stream_id).await;
        let Ok(guard) = lock.try_lock_owned() else {
            tracing::debug!(stream_id = %stream_id, "Skipping auto-restart, operation in flight");
            return;
        };

        let still_crashed = {
            let states = self.inner.states.read().await;
            states
                .get(&stream_id)
                .map(|e| e.status == StreamStatus::Crashed && e.epoch == crash_epoch)
                .unwrap_or(false)
        };
        if !still_crashed {
            return;
        }

        if let Err(e) = self.start_locked(&def, guard, false).await {
            tracing::error!(stream_id = %stream_id, error = %e, "Auto-restart failed");
        }
    }

    // ========================================
    // Internals
    // ========================================

    async fn resolve(&self, stream_id: &str) -> Result<StreamDefinition> {
        self.inner
            .store
            .get_stream(stream_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Stream {stream_id} not found")))
    }

    /// Get the per-id operation lock (create on first use)
    async fn op_lock(&self, stream_id: &str) -> Arc<Mutex<()>> {
        {
            let ops = self.inner.ops.read().await;
            if let Some(lock) = ops.get(stream_id) {
                return lock.clone();
            }
        }

        let mut ops = self.inner.ops.write().await;
        ops.entry(stream_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Fail-fast acquisition: a busy id is a Conflict, not a queue
    async fn try_op_lock(&self, stream_id: &str) -> Result<OwnedMutexGuard<()>> {
        let lock = self.op_lock(stream_id).await;
        lock.try_lock_owned().map_err(|_| {
            Error::Conflict(format!(
                "Operation already in flight for stream {stream_id}"
            ))
        })
    }

    async fn mutate<R>(&self, stream_id: &str, f: impl FnOnce(&mut RuntimeEntry) -> R) -> R {
        let mut states = self.inner.states.write().await;
        let entry = states.entry(stream_id.to_string()).or_default();
        f(entry)
    }

    async fn snapshot(&self, stream_id: &str) -> RuntimeSnapshot {
        let states = self.inner.states.read().await;
        match states.get(stream_id) {
            Some(entry) => snapshot_from(stream_id, entry),
            None => snapshot_from(stream_id, &RuntimeEntry::default()),
        }
    }
}

fn snapshot_from(stream_id: &str, entry: &RuntimeEntry) -> RuntimeSnapshot {
    RuntimeSnapshot {
        stream_id: stream_id.to_string(),
        status: entry.status,
        pid: entry.pid,
        started_at: entry.started_at,
        restart_count: entry.restart_count,
        last_exit_code: entry.last_exit_code,
        last_exit_reason: entry.last_exit_reason.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_store::{CreateStreamRequest, StreamProtocol};
    use crate::supervisor::RelayCommand;

    fn sh(script: &str) -> RelayCommand {
        RelayCommand {
            bin: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    async fn setup(
        cmd: RelayCommand,
        restart: RestartPolicy,
    ) -> (tempfile::TempDir, Arc<StreamStore>, StreamRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StreamStore::new(dir.path().to_path_buf()).await.unwrap());
        let registry = StreamRegistry::new(
            store.clone(),
            RelaySupervisor::new(cmd),
            Duration::from_secs(5),
            restart,
        );
        (dir, store, registry)
    }

    async fn create_stream(store: &StreamStore, enabled: bool) -> String {
        let req = CreateStreamRequest {
            name: "cam1".to_string(),
            url: "rtsp://x/y".to_string(),
            protocol: StreamProtocol::Rtsp,
            enabled,
            username: None,
            password: None,
            meta: Default::default(),
        };
        store.service().create_stream(req).await.unwrap().id
    }

    async fn wait_for(
        registry: &StreamRegistry,
        id: &str,
        pred: impl Fn(&RuntimeSnapshot) -> bool,
    ) -> RuntimeSnapshot {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            let snap = registry.status(id).await.unwrap();
            if pred(&snap) {
                return snap;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "timed out waiting for condition, last status: {:?}",
                snap.status
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn test_start_unknown_is_not_found() {
        let (_dir, _store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        assert!(matches!(
            registry.start("s-0").await.unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(matches!(
            registry.stop("s-0").await.unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_start_disabled_is_rejected() {
        let (_dir, store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        let id = create_stream(&store, false).await;
        assert!(matches!(
            registry.start(&id).await.unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let (_dir, store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        let snap = registry.start(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Running);
        assert!(snap.pid.is_some());
        assert!(snap.started_at.is_some());

        let snap = registry.stop(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Stopped);
        assert!(snap.pid.is_none());
    }

    #[tokio::test]
    async fn test_start_while_running_is_conflict() {
        let (_dir, store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        let first = registry.start(&id).await.unwrap();
        let first_pid = first.pid;

        let err = registry.start(&id).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        // No second process: pid unchanged
        assert_eq!(registry.status(&id).await.unwrap().pid, first_pid);

        registry.stop(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_idempotent() {
        let (_dir, store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        let snap = registry.stop(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Stopped);
        let snap = registry.stop(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Stopped);
    }

    #[tokio::test]
    async fn test_self_exit_transitions_to_crashed() {
        let (_dir, store, registry) = setup(sh("exit 3"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        registry.start(&id).await.unwrap();
        let snap = wait_for(&registry, &id, |s| s.status == StreamStatus::Crashed).await;
        assert_eq!(snap.last_exit_code, Some(3));
        assert_eq!(snap.restart_count, 0);
    }

    #[tokio::test]
    async fn test_crashed_can_be_restarted() {
        let (_dir, store, registry) = setup(sh("exit 1"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        registry.start(&id).await.unwrap();
        wait_for(&registry, &id, |s| s.status == StreamStatus::Crashed).await;

        // crashed -> starting is a legal transition
        let snap = registry.start(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Running);
        wait_for(&registry, &id, |s| s.status == StreamStatus::Crashed).await;
    }

    #[tokio::test]
    async fn test_stop_clears_crashed() {
        let (_dir, store, registry) = setup(sh("exit 1"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        registry.start(&id).await.unwrap();
        wait_for(&registry, &id, |s| s.status == StreamStatus::Crashed).await;

        let snap = registry.stop(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Stopped);
    }

    #[tokio::test]
    async fn test_spawn_failure_leaves_crashed() {
        let (_dir, store, registry) = setup(
            RelayCommand {
                bin: "definitely-not-a-real-binary".to_string(),
                args: vec![],
            },
            RestartPolicy::default(),
        )
        .await;
        let id = create_stream(&store, true).await;

        assert!(matches!(
            registry.start(&id).await.unwrap_err(),
            Error::Spawn(_)
        ));
        let snap = registry.status(&id).await.unwrap();
        assert_eq!(snap.status, StreamStatus::Crashed);
        assert!(snap.last_exit_reason.is_some());
    }

    #[tokio::test]
    async fn test_list_defaults_to_stopped() {
        let (_dir, store, registry) = setup(sh("sleep 30"), RestartPolicy::default()).await;
        create_stream(&store, true).await;
        store.refresh_cache().await.unwrap();

        let snaps = registry.list().await;
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].status, StreamStatus::Stopped);
    }

    #[tokio::test]
    async fn test_late_exit_does_not_resurrect_forgotten_stream() {
        let (_dir, store, registry) = setup(sh("sleep 0.2"), RestartPolicy::default()).await;
        let id = create_stream(&store, true).await;

        registry.start(&id).await.unwrap();
        store.service().delete_stream(&id).await.unwrap();
        registry.forget(&id).await;

        // The relay exits after the runtime entry is gone
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!registry.inner.states.read().await.contains_key(&id));
    }

    #[test]
    fn test_restart_policy_backoff() {
        let policy = RestartPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        // Capped
        assert_eq!(policy.delay_for(10), Duration::from_secs(1));
    }
}
