// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout-driven retry with exponential backoff.

use crate::prelude::*;
use bf_core::{Clock, RetryReason};

fn tight_timeouts() -> OrchestratorConfig {
    OrchestratorConfig {
        retry: RetryPolicy {
            max_attempts: 3,
            initial_delay_secs: 1.0,
            backoff_multiplier: 2.0,
            max_delay_secs: 300.0,
            jitter: false,
        },
        timeout: TimeoutConfig { check_interval: Duration::from_millis(50) },
        ..OrchestratorConfig::default()
    }
}

/// Submit a one-job campaign with a 1-second execution timeout and have a
/// worker claim it without ever responding.
async fn stick_job(cluster: &Cluster, worker_id: &str) -> (String, String) {
    let campaign_id = bf_core::Campaign::generate_id();
    cluster.store.create_campaign(bf_core::CampaignConfig::new(&campaign_id, "u", 1));
    let job = cluster.store.create_job(
        bf_core::JobConfig::new(bf_core::Job::id_for(&campaign_id, 0), &campaign_id, "u")
            .compute_unit("CPU")
            .timeout_seconds(1),
    );
    cluster.orch.dispatcher.dispatch(&job).await.unwrap();

    let popped = cluster
        .broker
        .pop_job(&[capability_queue("CPU")])
        .await
        .unwrap()
        .unwrap();
    cluster
        .store
        .update_job_status(&popped, JobStatus::Running, Some(worker_id))
        .unwrap();
    (campaign_id, popped)
}

#[tokio::test]
async fn sticking_job_retries_then_fails_permanently() {
    let cluster = Cluster::with_config(|c| {
        let tuned = tight_timeouts();
        c.retry = tuned.retry;
        c.timeout = tuned.timeout;
    });
    let worker = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    let (campaign_id, job_id) = stick_job(&cluster, &worker).await;

    // Attempt 1 times out: requeued with a 1s backoff
    cluster.clock.advance(Duration::from_secs(2));
    cluster.orch.timeouts.check_once().await;
    let job = cluster.store.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.retry_count, 1);
    assert_eq!(job.retry_after, Some(cluster.clock.epoch_ms() + 1_000));
    assert_eq!(
        cluster.broker.queue_len(&capability_queue("CPU")).await.unwrap(),
        1
    );

    // Attempt 2 sticks as well: 2s backoff
    cluster.broker.pop_job(&[capability_queue("CPU")]).await.unwrap();
    cluster
        .store
        .update_job_status(&job_id, JobStatus::Running, Some(&worker))
        .unwrap();
    cluster.clock.advance(Duration::from_secs(2));
    cluster.orch.timeouts.check_once().await;
    let job = cluster.store.get_job(&job_id).unwrap();
    assert_eq!(job.retry_count, 2);
    assert_eq!(job.retry_after, Some(cluster.clock.epoch_ms() + 2_000));

    // Attempt 3 sticks: the budget is spent and the job fails for good
    cluster.broker.pop_job(&[capability_queue("CPU")]).await.unwrap();
    cluster
        .store
        .update_job_status(&job_id, JobStatus::Running, Some(&worker))
        .unwrap();
    cluster.clock.advance(Duration::from_secs(2));
    cluster.orch.timeouts.check_once().await;

    let job = cluster.store.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);

    let campaign = cluster.store.get_campaign(&campaign_id).unwrap();
    assert_eq!(campaign.failed_jobs, 1);

    let history = cluster.orch.retries.tracker().history(&job_id);
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|r| r.reason == RetryReason::JobTimeout));
}

#[tokio::test]
async fn timed_out_worker_is_marked_faulty() {
    let cluster = Cluster::with_config(|c| {
        let tuned = tight_timeouts();
        c.retry = tuned.retry;
        c.timeout = tuned.timeout;
    });
    let worker = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    stick_job(&cluster, &worker).await;

    cluster.clock.advance(Duration::from_secs(2));
    cluster.orch.timeouts.check_once().await;

    assert_eq!(
        cluster.store.get_worker(&worker).unwrap().status,
        WorkerStatus::Faulty
    );
}

#[tokio::test]
async fn retried_job_that_finally_succeeds_completes_campaign() {
    let cluster = Cluster::with_config(|c| {
        let tuned = tight_timeouts();
        c.retry = tuned.retry;
        c.timeout = tuned.timeout;
    });
    let worker = cluster.register("U-alpha", "Worker Alpha", &["CPU"]);
    let (campaign_id, job_id) = stick_job(&cluster, &worker).await;

    cluster.clock.advance(Duration::from_secs(2));
    cluster.orch.timeouts.check_once().await;

    cluster.orch.start();

    // Second attempt succeeds
    cluster.broker.pop_job(&[capability_queue("CPU")]).await.unwrap();
    cluster
        .store
        .update_job_status(&job_id, JobStatus::Running, Some(&worker))
        .unwrap();
    cluster
        .broker
        .push_result(
            &BenchResult::new(&job_id, ResultStatus::Complete)
                .campaign_id(campaign_id.clone())
                .worker_id(worker.clone()),
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
    assert_eq!(campaign.failed_jobs, 0);

    cluster.orch.stop().await;
}
