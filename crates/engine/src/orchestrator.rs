// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root.
//!
//! Builds the store, broker seam, and background loops, and owns their
//! lifecycle. Start order: result processor, health monitor, timeout
//! engine, snapshotter. Stop reverses that order so the result processor
//! (the component the other loops feed) drains last.

use crate::dispatch::Dispatcher;
use crate::health::{HealthConfig, HealthMonitor};
use crate::results::ResultProcessor;
use crate::retry::RetryManager;
use crate::timeout::{TimeoutConfig, TimeoutEngine, TimeoutStats};
use bf_broker::Broker;
use bf_core::{Clock, RetryPolicy};
use bf_store::persist::{spawn_snapshotter, SNAPSHOT_INTERVAL};
use bf_store::StateStore;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long to wait for each loop to acknowledge shutdown.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrator-wide settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Directory for generated CSV reports.
    pub output_dir: PathBuf,
    pub snapshot_interval: Duration,
    pub health: HealthConfig,
    pub timeout: TimeoutConfig,
    pub retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            snapshot_interval: SNAPSHOT_INTERVAL,
            health: HealthConfig::default(),
            timeout: TimeoutConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Combined health + timeout summary for the monitoring endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringStats {
    pub health: HealthSummary,
    pub timeouts: TimeoutStats,
    pub retries: crate::retry::RetryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSummary {
    pub total_workers: usize,
    pub healthy_workers: usize,
    pub faulty_workers: usize,
    pub heartbeat_timeout_secs: u64,
    pub check_interval_secs: u64,
}

/// The assembled control plane.
pub struct Orchestrator<C: Clock> {
    pub store: Arc<StateStore<C>>,
    pub broker: Arc<dyn Broker>,
    pub dispatcher: Arc<Dispatcher>,
    pub health: Arc<HealthMonitor<C>>,
    pub timeouts: Arc<TimeoutEngine<C>>,
    pub retries: Arc<RetryManager>,
    config: OrchestratorConfig,
    processor: Arc<ResultProcessor<C>>,
    shutdown: CancellationToken,
    tasks: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
}

impl<C: Clock> Orchestrator<C> {
    pub fn new(
        store: Arc<StateStore<C>>,
        broker: Arc<dyn Broker>,
        clock: C,
        config: OrchestratorConfig,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(broker.clone()));
        let retries = Arc::new(RetryManager::new(config.retry.clone()));
        let health = Arc::new(HealthMonitor::new(
            store.clone(),
            clock.clone(),
            config.health.clone(),
        ));
        let timeouts = Arc::new(TimeoutEngine::new(
            store.clone(),
            broker.clone(),
            retries.clone(),
            clock,
            config.timeout.clone(),
            config.output_dir.clone(),
        ));
        let processor = Arc::new(ResultProcessor::new(
            store.clone(),
            broker.clone(),
            config.output_dir.clone(),
        ));

        Self {
            store,
            broker,
            dispatcher,
            health,
            timeouts,
            retries,
            config,
            processor,
            shutdown: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Start every background loop. Not idempotent; call once from the
    /// composition root.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock();
        tasks.push((
            "result-processor",
            self.processor.clone().spawn(self.shutdown.clone()),
        ));
        tasks.push((
            "health-monitor",
            self.health.clone().spawn(self.shutdown.clone()),
        ));
        tasks.push((
            "timeout-engine",
            self.timeouts.clone().spawn(self.shutdown.clone()),
        ));
        tasks.push((
            "snapshotter",
            spawn_snapshotter(
                self.store.clone(),
                self.config.snapshot_interval,
                self.shutdown.clone(),
            ),
        ));
        info!("orchestrator background loops started");
    }

    /// Stop all loops: signal once, then wait for each in reverse start
    /// order (result processor last) with a bounded timeout.
    pub async fn stop(&self) {
        self.shutdown.cancel();
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for (name, handle) in tasks.into_iter().rev() {
            match tokio::time::timeout(STOP_TIMEOUT, handle).await {
                Ok(Ok(())) => info!(task = name, "loop stopped"),
                Ok(Err(e)) => warn!(task = name, error = %e, "loop panicked"),
                Err(_) => warn!(task = name, "loop did not stop in time"),
            }
        }

        if let Err(e) = self.store.force_save() {
            warn!(error = %e, "final snapshot failed");
        }
    }

    /// Snapshot for `GET /api/monitoring/stats`.
    pub fn monitoring_stats(&self) -> MonitoringStats {
        let fleet = self.health.fleet_health();
        let health = HealthSummary {
            total_workers: fleet.len(),
            healthy_workers: fleet.iter().filter(|h| h.is_healthy).count(),
            faulty_workers: fleet
                .iter()
                .filter(|h| h.status == bf_core::WorkerStatus::Faulty)
                .count(),
            heartbeat_timeout_secs: self.health.config().heartbeat_timeout.as_secs(),
            check_interval_secs: self.health.config().check_interval.as_secs(),
        };
        MonitoringStats {
            health,
            timeouts: self.timeouts.stats(),
            retries: self.retries.stats(),
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
