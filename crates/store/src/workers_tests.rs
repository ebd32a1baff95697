// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_util::store;
use serde_json::json;
use std::time::Duration;

fn registration(udid: &str) -> RegisterWorker {
    RegisterWorker {
        device_name: "MacBook Pro".to_string(),
        ip_address: "192.168.1.100".to_string(),
        capabilities: vec!["CPU".to_string(), "GPU".to_string()],
        device_info: json!({
            "UDID": udid,
            "Soc": "Apple M1",
            "Ram": 16,
            "DeviceOs": "Darwin"
        }),
    }
}

#[test]
fn first_registration_creates_active_worker() {
    let (store, _, _dir) = store();
    let (worker_id, action) = store.register_worker(registration("U-1"));

    assert_eq!(action, RegisterAction::Created);
    let worker = store.get_worker(&worker_id).unwrap();
    assert_eq!(worker.status, WorkerStatus::Active);
    assert_eq!(worker.capabilities, vec!["cpu", "gpu"]);
    assert_eq!(worker.soc.as_deref(), Some("Apple M1"));
}

#[test]
fn reregistration_is_idempotent() {
    let (store, clock, _dir) = store();
    let (id1, _) = store.register_worker(registration("U-1"));

    clock.advance(Duration::from_secs(60));
    let mut again = registration("U-1");
    again.device_name = "Renamed Machine".to_string();
    let (id2, action) = store.register_worker(again);

    assert_eq!(id1, id2);
    assert_eq!(action, RegisterAction::Updated);
    assert_eq!(store.get_all_workers().len(), 1);

    let worker = store.get_worker(&id1).unwrap();
    assert_eq!(worker.device_name, "Renamed Machine");
    // registered_at survives, last_seen moves
    assert_eq!(worker.registered_at, 1_000_000);
    assert_eq!(worker.last_seen, 1_060_000);
}

#[test]
fn reregistration_recovers_faulty_worker() {
    let (store, _, _dir) = store();
    let (id, _) = store.register_worker(registration("U-1"));
    store
        .update_worker_status(&id, WorkerStatus::Faulty)
        .unwrap();

    let (_, action) = store.register_worker(registration("U-1"));
    assert_eq!(action, RegisterAction::Recovered);
    assert_eq!(
        store.get_worker(&id).unwrap().status,
        WorkerStatus::Active
    );
}

#[test]
fn reregistration_preserves_busy_status() {
    let (store, _, _dir) = store();
    let (id, _) = store.register_worker(registration("U-1"));
    store.update_worker_status(&id, WorkerStatus::Busy).unwrap();

    let (_, action) = store.register_worker(registration("U-1"));
    assert_eq!(action, RegisterAction::Updated);
    assert_eq!(store.get_worker(&id).unwrap().status, WorkerStatus::Busy);
}

#[test]
fn capability_query_filters_active_and_normalizes() {
    let (store, _, _dir) = store();
    let (cpu_id, _) = store.register_worker(RegisterWorker {
        device_name: "cpu box".to_string(),
        ip_address: "10.0.0.1".to_string(),
        capabilities: vec!["CPU (ONNX)".to_string()],
        device_info: json!({"UDID": "U-cpu"}),
    });
    store.register_worker(RegisterWorker {
        device_name: "gpu box".to_string(),
        ip_address: "10.0.0.2".to_string(),
        capabilities: vec!["GPU".to_string()],
        device_info: json!({"UDID": "U-gpu"}),
    });

    let found = store.get_workers_by_capability("cpu (onnx)");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].worker_id, cpu_id);

    // Faulty workers are excluded from both views
    assert_eq!(store.get_active_workers().len(), 2);
    store
        .update_worker_status(&cpu_id, WorkerStatus::Faulty)
        .unwrap();
    assert!(store.get_workers_by_capability("CPU (ONNX)").is_empty());
    assert_eq!(store.get_active_workers().len(), 1);
}

#[test]
fn status_update_enforces_state_machine() {
    let (store, _, _dir) = store();
    let (id, _) = store.register_worker(registration("U-1"));

    store.update_worker_status(&id, WorkerStatus::Busy).unwrap();
    let err = store
        .update_worker_status(&id, WorkerStatus::Active)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition(_)));

    // Worker is untouched after a refused transition
    assert_eq!(store.get_worker(&id).unwrap().status, WorkerStatus::Busy);
}

#[test]
fn status_update_unknown_worker() {
    let (store, _, _dir) = store();
    let err = store
        .update_worker_status("worker-nope", WorkerStatus::Faulty)
        .unwrap_err();
    assert!(matches!(err, StoreError::WorkerNotFound(_)));
}
