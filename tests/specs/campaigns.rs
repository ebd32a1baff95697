// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign happy path: capability routing, result ingestion, CSV report.

use crate::prelude::*;

#[tokio::test]
async fn capability_routed_campaign_completes_with_csv() {
    let cluster = Cluster::new();
    let worker = cluster.register("U-alpha", "Worker Alpha", &["CPU", "GPU"]);

    let campaign_id = cluster.submit_campaign(&["CPU", "GPU"]).await;

    // One job on each capability queue
    assert_eq!(
        cluster.broker.queue_len(&capability_queue("CPU")).await.unwrap(),
        1
    );
    assert_eq!(
        cluster.broker.queue_len(&capability_queue("GPU")).await.unwrap(),
        1
    );

    cluster.orch.start();

    // The stub worker drains both jobs and publishes Complete results
    assert!(cluster.stub_worker_runs_one(&worker).await.is_some());
    assert!(cluster.stub_worker_runs_one(&worker).await.is_some());
    assert!(cluster.stub_worker_runs_one(&worker).await.is_none());

    let settled = cluster
        .wait_for(|| {
            cluster
                .store
                .get_campaign(&campaign_id)
                .is_some_and(|c| c.status == CampaignStatus::Completed)
        })
        .await;
    assert!(settled, "campaign should complete after both results");

    let campaign = cluster.store.get_campaign(&campaign_id).unwrap();
    assert_eq!(campaign.completed_jobs, 2);
    assert_eq!(campaign.failed_jobs, 0);

    let csv_path = campaign.results_file.expect("CSV report attached");
    let content = std::fs::read_to_string(&csv_path).unwrap();
    // Header row plus one data row per job
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("Worker Alpha"));

    cluster.orch.stop().await;
}

#[tokio::test]
async fn empty_campaign_is_completed_on_create() {
    let cluster = Cluster::new();
    let campaign_id = cluster.submit_campaign(&[]).await;
    let campaign = cluster.store.get_campaign(&campaign_id).unwrap();
    assert_eq!(campaign.status, CampaignStatus::Completed);
    assert_eq!(campaign.total_jobs, 0);
}

#[tokio::test]
async fn mixed_outcomes_settle_campaign() {
    let cluster = Cluster::new();
    let worker = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    let campaign_id = cluster.submit_campaign(&["CPU", "CPU"]).await;

    cluster.orch.start();

    // First job succeeds via the stub
    cluster.stub_worker_runs_one(&worker).await.unwrap();

    // Second job fails on the device
    let queues = polling_order(&worker, &["cpu".to_string()]);
    let failing = cluster.broker.pop_job(&queues).await.unwrap().unwrap();
    cluster
        .store
        .update_job_status(&failing, JobStatus::Running, Some(&worker))
        .unwrap();
    cluster
        .broker
        .push_result(
            &BenchResult::new(&failing, ResultStatus::Failed)
                .campaign_id(campaign_id.clone())
                .worker_id(worker.clone())
                .remark("inference runtime crashed"),
        )
        .await
        .unwrap();

    let settled = cluster
        .wait_for(|| {
            cluster
                .store
                .get_campaign(&campaign_id)
                .is_some_and(|c| c.status == CampaignStatus::Completed)
        })
        .await;
    assert!(settled);

    let campaign = cluster.store.get_campaign(&campaign_id).unwrap();
    assert_eq!(campaign.completed_jobs, 1);
    assert_eq!(campaign.failed_jobs, 1);

    cluster.orch.stop().await;
}
