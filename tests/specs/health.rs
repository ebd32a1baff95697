// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat-driven failure detection and recovery.

use crate::prelude::*;

fn short_heartbeat() -> OrchestratorConfig {
    OrchestratorConfig {
        health: HealthConfig {
            heartbeat_timeout: Duration::from_secs(2),
            check_interval: Duration::from_millis(50),
        },
        ..OrchestratorConfig::default()
    }
}

#[tokio::test]
async fn silent_worker_goes_faulty_within_checks() {
    let cluster = Cluster::with_config(|c| c.health = short_heartbeat().health);
    let alpha = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    cluster.orch.health.record_heartbeat(&alpha).unwrap();

    cluster.orch.start();

    // Silence for 5 fake seconds; the loop ticks on real time and reads
    // the fake clock.
    cluster.clock.advance(Duration::from_secs(5));
    let faulted = cluster
        .wait_for(|| {
            cluster
                .store
                .get_worker(&alpha)
                .is_some_and(|w| w.status == WorkerStatus::Faulty)
        })
        .await;
    assert!(faulted, "silent worker should be marked faulty");

    // And it no longer serves capability queries
    assert!(cluster.store.get_workers_by_capability("CPU").is_empty());

    cluster.orch.stop().await;
}

#[tokio::test]
async fn heartbeat_recovers_faulty_worker_for_dispatch() {
    let cluster = Cluster::with_config(|c| c.health = short_heartbeat().health);
    let alpha = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    cluster.orch.health.record_heartbeat(&alpha).unwrap();

    cluster.clock.advance(Duration::from_secs(5));
    cluster.orch.health.check_once();
    assert_eq!(
        cluster.store.get_worker(&alpha).unwrap().status,
        WorkerStatus::Faulty
    );

    let ack = cluster.orch.health.record_heartbeat(&alpha).unwrap();
    assert_eq!(ack.previous_status, WorkerStatus::Faulty);
    assert_eq!(ack.action, "recovered");
    assert_eq!(
        cluster.store.get_worker(&alpha).unwrap().status,
        WorkerStatus::Active
    );
    assert_eq!(cluster.store.get_workers_by_capability("CPU").len(), 1);
}

#[tokio::test]
async fn heartbeats_keep_worker_active() {
    let cluster = Cluster::with_config(|c| c.health = short_heartbeat().health);
    let alpha = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);

    for _ in 0..5 {
        cluster.orch.health.record_heartbeat(&alpha).unwrap();
        cluster.clock.advance(Duration::from_secs(1));
        cluster.orch.health.check_once();
    }
    assert_eq!(
        cluster.store.get_worker(&alpha).unwrap().status,
        WorkerStatus::Active
    );
}
