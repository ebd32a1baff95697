// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing: static pins beat capability pools.

use crate::prelude::*;

#[tokio::test]
async fn static_pin_wins_over_capability() {
    let cluster = Cluster::new();
    cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    let beta = cluster.register("U-beta", "Worker Beta", &["CPU"]);

    let campaign_id = bf_core::Campaign::generate_id();
    cluster.store.create_campaign(bf_core::CampaignConfig::new(&campaign_id, "u", 1));
    let job = cluster.store.create_job(
        bf_core::JobConfig::new(bf_core::Job::id_for(&campaign_id, 0), &campaign_id, "u")
            .compute_unit("CPU")
            .worker_id(beta.clone()),
    );
    cluster.orch.dispatcher.dispatch(&job).await.unwrap();

    assert_eq!(
        cluster.broker.queue_len(&worker_queue(&beta)).await.unwrap(),
        1
    );
    assert_eq!(
        cluster.broker.queue_len(&capability_queue("CPU")).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn pinned_queue_has_priority_at_the_worker() {
    let cluster = Cluster::new();
    let alpha = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);

    // A pool job lands first, then a pinned one
    cluster
        .broker
        .push_job(&capability_queue("CPU"), "pool-job")
        .await
        .unwrap();
    cluster
        .broker
        .push_job(&worker_queue(&alpha), "pinned-job")
        .await
        .unwrap();

    let worker = cluster.store.get_worker(&alpha).unwrap();
    let order = polling_order(&alpha, &worker.capabilities);
    assert_eq!(
        cluster.broker.pop_job(&order).await.unwrap().as_deref(),
        Some("pinned-job")
    );
}

#[tokio::test]
async fn faulty_worker_is_not_eligible_for_capability_dispatch() {
    let cluster = Cluster::new();
    let alpha = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);

    assert_eq!(cluster.store.get_workers_by_capability("CPU").len(), 1);
    cluster
        .store
        .update_worker_status(&alpha, WorkerStatus::Faulty)
        .unwrap();
    assert!(cluster.store.get_workers_by_capability("CPU").is_empty());
}
