// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared spec harness.

#![allow(dead_code)]

pub use bf_broker::queues::{capability_queue, polling_order, worker_queue};
pub use bf_broker::{Broker, MemoryBroker};
pub use bf_core::{
    BenchResult, CampaignStatus, FakeClock, JobStatus, Metrics, ResultStatus, RetryPolicy,
    WorkerStatus,
};
pub use bf_engine::{HealthConfig, Orchestrator, OrchestratorConfig, TimeoutConfig};
pub use bf_store::{RegisterWorker, StateStore};
pub use std::sync::Arc;
pub use std::time::Duration;

use tempfile::TempDir;

/// An orchestrator wired to an in-memory broker and a fake clock.
pub struct Cluster {
    pub orch: Arc<Orchestrator<FakeClock>>,
    pub store: Arc<StateStore<FakeClock>>,
    pub clock: FakeClock,
    pub broker: Arc<MemoryBroker>,
    pub dir: TempDir,
}

impl Cluster {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(tune: impl FnOnce(&mut OrchestratorConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let clock = FakeClock::new();
        let store = Arc::new(StateStore::open_with_clock(
            dir.path().join("state.json"),
            clock.clone(),
        ));
        let broker = Arc::new(MemoryBroker::new());

        let mut config = OrchestratorConfig {
            output_dir: dir.path().join("outputs"),
            ..OrchestratorConfig::default()
        };
        tune(&mut config);

        let orch = Arc::new(Orchestrator::new(
            store.clone(),
            broker.clone(),
            clock.clone(),
            config,
        ));
        Self { orch, store, clock, broker, dir }
    }

    /// Register a worker and return its id.
    pub fn register(&self, udid: &str, device_name: &str, capabilities: &[&str]) -> String {
        let (worker_id, _) = self.store.register_worker(RegisterWorker {
            device_name: device_name.to_string(),
            ip_address: "192.168.1.10".to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            device_info: serde_json::json!({
                "UDID": udid,
                "DeviceName": device_name,
                "Soc": "M1",
                "Ram": 16,
                "DeviceOs": "Darwin",
            }),
        });
        worker_id
    }

    /// Submit a campaign the way the HTTP edge does: campaign row, one job
    /// row per unit, then dispatch. Returns the campaign id.
    pub async fn submit_campaign(&self, units: &[&str]) -> String {
        let campaign_id = bf_core::Campaign::generate_id();
        self.store.create_campaign(bf_core::CampaignConfig::new(
            &campaign_id,
            "https://models.test/model.onnx",
            units.len() as u32,
        ));
        for (i, unit) in units.iter().enumerate() {
            self.store.create_job(
                bf_core::JobConfig::new(
                    bf_core::Job::id_for(&campaign_id, i),
                    &campaign_id,
                    "https://models.test/model.onnx",
                )
                .compute_unit(*unit),
            );
        }
        self.orch.dispatcher.dispatch_campaign(&self.store, &campaign_id).await;
        campaign_id
    }

    /// Stub worker agent: pop one job in polling order, claim it, and
    /// publish a canned Complete result. Returns the job id, if any.
    pub async fn stub_worker_runs_one(&self, worker_id: &str) -> Option<String> {
        let worker = self.store.get_worker(worker_id)?;
        let queues = polling_order(worker_id, &worker.capabilities);
        let job_id = self.broker.pop_job(&queues).await.unwrap()?;

        self.store
            .update_job_status(&job_id, JobStatus::Running, Some(worker_id))
            .unwrap();
        let job = self.store.get_job(&job_id).unwrap();

        self.broker
            .push_result(
                &BenchResult::new(&job_id, ResultStatus::Complete)
                    .campaign_id(job.campaign_id)
                    .worker_id(worker_id)
                    .metrics(Metrics {
                        file_name: Some("model.onnx".to_string()),
                        compute_units: job.compute_unit.clone(),
                        load_ms_median: Some(12.0),
                        inference_ms_median: Some(3.5),
                        ..Metrics::default()
                    }),
            )
            .await
            .unwrap();
        Some(job_id)
    }

    /// Poll until `check` passes or ~2s of real time elapses.
    pub async fn wait_for(&self, mut check: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if check() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}
