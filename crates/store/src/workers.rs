// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registry operations.

use crate::{StateStore, StoreError};
use bf_core::{normalize_compute_unit, worker_fingerprint, Clock, Worker, WorkerStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Registration input from the HTTP edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorker {
    pub device_name: String,
    pub ip_address: String,
    pub capabilities: Vec<String>,
    pub device_info: Value,
}

/// What a registration call did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterAction {
    Created,
    Updated,
    /// Existing row was faulty and came back to active.
    Recovered,
}

bf_core::simple_display! {
    RegisterAction {
        Created => "created",
        Updated => "updated",
        Recovered => "recovered",
    }
}

impl<C: Clock> StateStore<C> {
    /// Register a worker, or rehydrate the existing row for the same device.
    ///
    /// The worker id is derived deterministically from `device_info`, so the
    /// same physical device always lands on the same row. Re-registration
    /// refreshes the device fields and `last_seen`, keeps `registered_at`,
    /// and recovers a faulty worker to active.
    pub fn register_worker(&self, reg: RegisterWorker) -> (String, RegisterAction) {
        let now = self.now_ms();
        let worker_id = worker_fingerprint(&reg.device_info);

        self.with_state_mut(|state| {
            let action = match state.workers.get_mut(&worker_id) {
                Some(existing) => {
                    let was_faulty = existing.status == WorkerStatus::Faulty;
                    let registered_at = existing.registered_at;

                    let mut updated = Worker::from_registration(
                        &worker_id,
                        reg.device_name,
                        reg.ip_address,
                        &reg.capabilities,
                        reg.device_info,
                        now,
                    );
                    updated.registered_at = registered_at;
                    if !was_faulty {
                        updated.status = existing.status;
                    }
                    *existing = updated;

                    if was_faulty {
                        RegisterAction::Recovered
                    } else {
                        RegisterAction::Updated
                    }
                }
                None => {
                    let worker = Worker::from_registration(
                        &worker_id,
                        reg.device_name,
                        reg.ip_address,
                        &reg.capabilities,
                        reg.device_info,
                        now,
                    );
                    state.workers.insert(worker_id.clone(), worker);
                    RegisterAction::Created
                }
            };
            info!(worker_id = %worker_id, action = %action, "worker registered");
            (worker_id.clone(), action)
        })
    }

    pub fn get_worker(&self, worker_id: &str) -> Option<Worker> {
        self.with_state(|state| state.workers.get(worker_id).cloned())
    }

    pub fn get_all_workers(&self) -> Vec<Worker> {
        self.with_state(|state| state.workers.values().cloned().collect())
    }

    pub fn get_active_workers(&self) -> Vec<Worker> {
        self.with_state(|state| {
            state
                .workers
                .values()
                .filter(|w| w.status == WorkerStatus::Active)
                .cloned()
                .collect()
        })
    }

    /// Active workers declaring the given compute unit (any spelling).
    pub fn get_workers_by_capability(&self, compute_unit: &str) -> Vec<Worker> {
        let unit = normalize_compute_unit(compute_unit);
        self.with_state(|state| {
            state
                .workers
                .values()
                .filter(|w| w.status == WorkerStatus::Active && w.has_capability(&unit))
                .cloned()
                .collect()
        })
    }

    /// Move a worker through the state machine, bumping `last_seen`.
    pub fn update_worker_status(
        &self,
        worker_id: &str,
        status: WorkerStatus,
    ) -> Result<Worker, StoreError> {
        let now = self.now_ms();
        self.with_state_mut(|state| {
            let worker = state
                .workers
                .get_mut(worker_id)
                .ok_or_else(|| StoreError::WorkerNotFound(worker_id.to_string()))?;
            worker.status = worker.status.transition(status)?;
            worker.last_seen = now;
            Ok(worker.clone())
        })
    }
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
