// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker record and lifecycle state machine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::capability::normalize_compute_unit;

/// Worker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Ready to accept jobs
    Active,
    /// Currently executing a job
    Busy,
    /// Cleaning up after a job
    Cleanup,
    /// Unresponsive or errored; excluded from dispatch
    Faulty,
}

crate::simple_display! {
    WorkerStatus {
        Active => "active",
        Busy => "busy",
        Cleanup => "cleanup",
        Faulty => "faulty",
    }
}

impl WorkerStatus {
    /// Parse the lowercase wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "busy" => Some(Self::Busy),
            "cleanup" => Some(Self::Cleanup),
            "faulty" => Some(Self::Faulty),
            _ => None,
        }
    }

    /// Check whether moving to `target` is an admissible transition.
    ///
    /// Self-transitions are never admissible. `faulty` can only be left
    /// through recovery to `active`.
    pub fn can_transition(self, target: WorkerStatus) -> bool {
        use WorkerStatus::*;
        match (self, target) {
            (Active, Busy) | (Active, Faulty) => true,
            (Busy, Cleanup) | (Busy, Faulty) => true,
            (Cleanup, Active) | (Cleanup, Faulty) => true,
            (Faulty, Active) => true,
            _ => false,
        }
    }

    /// Validate a transition, returning the `(from, to)` pair on refusal.
    pub fn transition(self, target: WorkerStatus) -> Result<WorkerStatus, InvalidTransition> {
        if self.can_transition(target) {
            Ok(target)
        } else {
            Err(InvalidTransition { from: self, to: target })
        }
    }
}

/// Refused worker state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid worker state transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: WorkerStatus,
    pub to: WorkerStatus,
}

/// A registered execution host.
///
/// Created on first registration and never deleted; re-registration with the
/// same derived id updates the row in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,
    pub device_name: String,
    pub ip_address: String,
    /// Compute-unit tags, stored normalized so they match queue names.
    pub capabilities: Vec<String>,
    /// Raw device description as reported by the agent.
    pub device_info: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_gpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram: Option<String>,
    pub status: WorkerStatus,
    /// Epoch ms of first registration; preserved across re-registration.
    pub registered_at: u64,
    /// Epoch ms of the last registration, heartbeat, or status change.
    pub last_seen: u64,
}

impl Worker {
    /// Build a worker row from registration input.
    ///
    /// Capabilities are normalized and the searchable device fields are
    /// extracted out of the opaque `device_info` blob.
    pub fn from_registration(
        worker_id: impl Into<String>,
        device_name: impl Into<String>,
        ip_address: impl Into<String>,
        capabilities: &[String],
        device_info: Value,
        now_ms: u64,
    ) -> Self {
        let capabilities = capabilities
            .iter()
            .map(|c| normalize_compute_unit(c))
            .collect();

        Self {
            worker_id: worker_id.into(),
            device_name: device_name.into(),
            ip_address: ip_address.into(),
            capabilities,
            soc: info_str(&device_info, "Soc"),
            ram_gb: info_ram(&device_info),
            os: info_str(&device_info, "DeviceOs"),
            os_version: info_str(&device_info, "DeviceOsVersion"),
            udid: info_str(&device_info, "UDID"),
            device_year: info_str(&device_info, "DeviceYear"),
            discrete_gpu: info_str(&device_info, "DiscreteGpu"),
            vram: info_str(&device_info, "VRam"),
            device_info,
            status: WorkerStatus::Active,
            registered_at: now_ms,
            last_seen: now_ms,
        }
    }

    /// Whether this worker declares the given (already normalized) capability.
    pub fn has_capability(&self, normalized_unit: &str) -> bool {
        self.capabilities.iter().any(|c| c == normalized_unit)
    }
}

fn info_str(info: &Value, key: &str) -> Option<String> {
    info.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn info_ram(info: &Value) -> Option<f64> {
    match info.get("Ram")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

crate::builder! {
    pub struct WorkerBuilder => Worker {
        into {
            worker_id: String = "worker-test",
            device_name: String = "Test Machine",
            ip_address: String = "127.0.0.1",
        }
        set {
            capabilities: Vec<String> = vec!["cpu".to_string()],
            device_info: Value = Value::Null,
            status: WorkerStatus = WorkerStatus::Active,
            registered_at: u64 = 1_000_000,
            last_seen: u64 = 1_000_000,
        }
        option {
            soc: String = None,
            ram_gb: f64 = None,
            os: String = None,
            os_version: String = None,
            udid: String = None,
            device_year: String = None,
            discrete_gpu: String = None,
            vram: String = None,
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
