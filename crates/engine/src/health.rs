// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker health monitoring.
//!
//! Workers heartbeat over HTTP; this monitor keeps the per-worker
//! `last_heartbeat` timestamps in memory (reseeded after a restart) and
//! marks silent workers faulty. A heartbeat from a faulty worker recovers
//! it; besides operator reset and re-registration, that is the only way
//! out of `faulty`.

use bf_core::{Clock, WorkerStatus};
use bf_store::{StateStore, StoreError};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Health monitor tuning.
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Silence beyond this marks a worker faulty.
    pub heartbeat_timeout: Duration,
    pub check_interval: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(60),
            check_interval: Duration::from_secs(10),
        }
    }
}

/// What a heartbeat did.
#[derive(Debug, Clone, Serialize)]
pub struct HeartbeatAck {
    pub worker_id: String,
    pub previous_status: WorkerStatus,
    pub status: WorkerStatus,
    /// `"recovered"` when the heartbeat brought a faulty worker back.
    pub action: &'static str,
}

/// Heartbeat-derived view of one worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerHealth {
    pub worker_id: String,
    pub status: WorkerStatus,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_since_heartbeat: Option<f64>,
    pub heartbeat_timeout_secs: u64,
}

/// Tracks heartbeats and transitions silent workers to faulty.
pub struct HealthMonitor<C: Clock> {
    store: Arc<StateStore<C>>,
    clock: C,
    config: HealthConfig,
    last_heartbeat: Mutex<HashMap<String, u64>>,
}

impl<C: Clock> HealthMonitor<C> {
    pub fn new(store: Arc<StateStore<C>>, clock: C, config: HealthConfig) -> Self {
        Self { store, clock, config, last_heartbeat: Mutex::new(HashMap::new()) }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Record a heartbeat, recovering the worker if it was faulty.
    pub fn record_heartbeat(&self, worker_id: &str) -> Result<HeartbeatAck, StoreError> {
        let worker = self
            .store
            .get_worker(worker_id)
            .ok_or_else(|| StoreError::WorkerNotFound(worker_id.to_string()))?;

        self.last_heartbeat
            .lock()
            .insert(worker_id.to_string(), self.clock.epoch_ms());
        debug!(worker_id, "heartbeat");

        let previous_status = worker.status;
        let (status, action) = if previous_status == WorkerStatus::Faulty {
            let recovered = self
                .store
                .update_worker_status(worker_id, WorkerStatus::Active)?;
            info!(worker_id, "worker recovered via heartbeat");
            (recovered.status, "recovered")
        } else {
            (previous_status, "ok")
        };

        Ok(HeartbeatAck {
            worker_id: worker_id.to_string(),
            previous_status,
            status,
            action,
        })
    }

    /// One monitor tick: mark workers silent past the timeout as faulty.
    ///
    /// A worker with no heartbeat on record is seeded with the current time
    /// so a fleet restart does not instantly fault everyone.
    pub fn check_once(&self) {
        let now = self.clock.epoch_ms();
        let timeout_ms = self.config.heartbeat_timeout.as_millis() as u64;

        for worker in self.store.get_all_workers() {
            if worker.status == WorkerStatus::Faulty {
                continue;
            }

            let last = {
                let mut beats = self.last_heartbeat.lock();
                match beats.get(&worker.worker_id) {
                    Some(&ts) => ts,
                    None => {
                        beats.insert(worker.worker_id.clone(), now);
                        continue;
                    }
                }
            };

            let silence = now.saturating_sub(last);
            if silence > timeout_ms {
                warn!(
                    worker_id = %worker.worker_id,
                    silence_secs = silence / 1000,
                    "worker heartbeat timeout"
                );
                if let Err(e) = self
                    .store
                    .update_worker_status(&worker.worker_id, WorkerStatus::Faulty)
                {
                    error!(worker_id = %worker.worker_id, error = %e, "failed to mark worker faulty");
                }
            }
        }
    }

    /// Heartbeat health for one worker, if it exists.
    pub fn worker_health(&self, worker_id: &str) -> Option<WorkerHealth> {
        let worker = self.store.get_worker(worker_id)?;
        let now = self.clock.epoch_ms();
        let last = self.last_heartbeat.lock().get(worker_id).copied();

        let seconds_since = last.map(|ts| now.saturating_sub(ts) as f64 / 1000.0);
        let is_healthy = match seconds_since {
            // Never heard from: healthy until the first check seeds it
            None => true,
            Some(secs) => secs < self.config.heartbeat_timeout.as_secs_f64(),
        };

        Some(WorkerHealth {
            worker_id: worker_id.to_string(),
            status: worker.status,
            is_healthy,
            last_heartbeat_ms: last,
            seconds_since_heartbeat: seconds_since,
            heartbeat_timeout_secs: self.config.heartbeat_timeout.as_secs(),
        })
    }

    /// Heartbeat health for the whole fleet.
    pub fn fleet_health(&self) -> Vec<WorkerHealth> {
        self.store
            .get_all_workers()
            .iter()
            .filter_map(|w| self.worker_health(&w.worker_id))
            .collect()
    }

    /// Spawn the monitoring loop.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                timeout_secs = self.config.heartbeat_timeout.as_secs(),
                interval_secs = self.config.check_interval.as_secs(),
                "health monitor started"
            );
            let mut ticker = tokio::time::interval(self.config.check_interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => self.check_once(),
                }
            }
            info!("health monitor stopped");
        })
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
