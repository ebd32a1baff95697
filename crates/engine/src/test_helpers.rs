// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use bf_broker::{Broker, MemoryBroker};
use bf_core::{CampaignConfig, FakeClock, Job, JobConfig};
use bf_store::{RegisterWorker, StateStore};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) struct Fixture {
    pub store: Arc<StateStore<FakeClock>>,
    pub clock: FakeClock,
    pub broker: Arc<MemoryBroker>,
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let clock = FakeClock::new();
        let store = Arc::new(StateStore::open_with_clock(
            dir.path().join("state.json"),
            clock.clone(),
        ));
        Self { store, clock, broker: Arc::new(MemoryBroker::new()), dir }
    }

    pub fn dyn_broker(&self) -> Arc<dyn Broker> {
        self.broker.clone()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("outputs")
    }

    /// Register a worker with the given UDID and capabilities, returning
    /// its id.
    pub fn register_worker(&self, udid: &str, capabilities: &[&str]) -> String {
        let (worker_id, _) = self.store.register_worker(RegisterWorker {
            device_name: "Test Machine".to_string(),
            ip_address: "10.0.0.1".to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            device_info: json!({
                "UDID": udid,
                "Soc": "M1",
                "Ram": 16,
                "DeviceOs": "Darwin"
            }),
        });
        worker_id
    }

    /// Create a campaign with one pending job per compute unit.
    pub fn campaign_with_jobs(&self, campaign_id: &str, units: &[&str]) -> Vec<Job> {
        self.store.create_campaign(CampaignConfig::new(
            campaign_id,
            "https://models.test/model.onnx",
            units.len() as u32,
        ));
        units
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                self.store.create_job(
                    JobConfig::new(
                        Job::id_for(campaign_id, i),
                        campaign_id,
                        "https://models.test/model.onnx",
                    )
                    .compute_unit(*unit),
                )
            })
            .collect()
    }
}
