// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic worker identity across re-registration.

use crate::prelude::*;

#[tokio::test]
async fn same_udid_yields_same_worker_id() {
    let cluster = Cluster::new();
    let first = cluster.register("U-1", "Original Name", &["CPU"]);
    let second = cluster.register("U-1", "Renamed Device", &["CPU"]);

    assert_eq!(first, second);
    assert_eq!(cluster.store.get_all_workers().len(), 1);
    assert_eq!(
        cluster.store.get_worker(&first).unwrap().device_name,
        "Renamed Device"
    );
}

#[tokio::test]
async fn different_udids_yield_different_workers() {
    let cluster = Cluster::new();
    let first = cluster.register("U-1", "Device One", &["CPU"]);
    let second = cluster.register("U-2", "Device Two", &["CPU"]);
    assert_ne!(first, second);
    assert_eq!(cluster.store.get_all_workers().len(), 2);
}

#[tokio::test]
async fn reregistration_recovers_faulty_worker() {
    let cluster = Cluster::new();
    let id = cluster.register("U-1", "Device", &["CPU"]);
    cluster
        .store
        .update_worker_status(&id, WorkerStatus::Faulty)
        .unwrap();

    cluster.register("U-1", "Device", &["CPU"]);
    assert_eq!(
        cluster.store.get_worker(&id).unwrap().status,
        WorkerStatus::Active
    );
}

#[tokio::test]
async fn state_survives_snapshot_reload() {
    let cluster = Cluster::new();
    let id = cluster.register("U-1", "Device", &["CPU"]);
    cluster.submit_campaign(&["CPU"]).await;
    cluster.store.force_save().unwrap();

    let reloaded = StateStore::open_with_clock(
        cluster.dir.path().join("state.json"),
        cluster.clock.clone(),
    );
    assert_eq!(reloaded.get_worker(&id).unwrap().device_name, "Device");
    assert_eq!(reloaded.get_all_campaigns().len(), 1);
    assert_eq!(reloaded.get_jobs_by_status(JobStatus::Pending).len(), 1);
}
