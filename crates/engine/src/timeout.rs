// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job timeout detection and retry.
//!
//! Scans running jobs for ones that have exceeded their execution timeout.
//! A timed-out job's worker is suspect and gets marked faulty; the job
//! itself retries with exponential backoff until the attempt budget runs
//! out, then fails for good.

use crate::progress;
use crate::retry::RetryManager;
use bf_broker::queues::capability_queue;
use bf_broker::Broker;
use bf_core::{Clock, JobStatus, RetryReason, WorkerStatus};
use bf_store::StateStore;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Timeout engine tuning.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    pub check_interval: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { check_interval: Duration::from_secs(5) }
    }
}

/// Timeout counters for the monitoring endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TimeoutStats {
    pub total_jobs: usize,
    pub running_jobs: usize,
    pub timed_out_jobs: usize,
    pub failed_jobs: usize,
    pub check_interval_secs: u64,
}

/// Detects stuck jobs and requeues or fails them.
pub struct TimeoutEngine<C: Clock> {
    store: Arc<StateStore<C>>,
    broker: Arc<dyn Broker>,
    retries: Arc<RetryManager>,
    clock: C,
    config: TimeoutConfig,
    output_dir: PathBuf,
}

impl<C: Clock> TimeoutEngine<C> {
    pub fn new(
        store: Arc<StateStore<C>>,
        broker: Arc<dyn Broker>,
        retries: Arc<RetryManager>,
        clock: C,
        config: TimeoutConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            broker,
            retries,
            clock,
            config,
            output_dir: output_dir.into(),
        }
    }

    pub fn config(&self) -> &TimeoutConfig {
        &self.config
    }

    /// One scan over running jobs.
    pub async fn check_once(&self) {
        let now = self.clock.epoch_ms();
        for job in self.store.get_jobs_by_status(JobStatus::Running) {
            if job.is_overdue(now) {
                warn!(
                    job_id = %job.job_id,
                    timeout_secs = job.timeout_seconds,
                    "job timed out"
                );
                self.handle_timeout(&job).await;
            }
        }
    }

    /// Timeout arc for one job: mark timed out, fault the worker, then
    /// retry with backoff or fail permanently.
    async fn handle_timeout(&self, job: &bf_core::Job) {
        let job_id = &job.job_id;
        let now = self.clock.epoch_ms();

        if let Err(e) = self.store.update_job_status(job_id, JobStatus::TimedOut, None) {
            error!(job_id, error = %e, "failed to mark job timed out");
            return;
        }

        // The assigned worker stopped reporting; treat it as faulty. The
        // transition can legitimately be refused (heartbeat monitor beat us
        // to it), so refusals only log.
        if let Some(worker_id) = &job.worker_id {
            match self.store.update_worker_status(worker_id, WorkerStatus::Faulty) {
                Ok(_) => warn!(worker_id, job_id, "worker marked faulty after job timeout"),
                Err(e) => info!(worker_id, error = %e, "worker not transitioned to faulty"),
            }
        }

        match self.retries.retry_job(job_id, RetryReason::JobTimeout, now) {
            Some(outcome) => {
                let retry_after = now + (outcome.delay_secs * 1000.0) as u64;
                let requeued = self
                    .store
                    .increment_job_retry(job_id)
                    .and_then(|_| self.store.requeue_job_for_retry(job_id, retry_after));
                if let Err(e) = requeued {
                    error!(job_id, error = %e, "failed to requeue job");
                    return;
                }

                // The pin is cleared on retry, so the job can only travel by
                // capability. Push immediately; workers honor retry_after at
                // pop time.
                let Some(unit) = &job.compute_unit else {
                    warn!(job_id, "timed-out job has no compute unit; cannot requeue");
                    return;
                };
                let queue = capability_queue(unit);
                match self.broker.push_job(&queue, job_id).await {
                    Ok(()) => info!(
                        job_id,
                        queue,
                        attempt = outcome.attempt,
                        backoff_secs = outcome.delay_secs,
                        "job requeued after timeout"
                    ),
                    Err(e) => error!(job_id, error = %e, "failed to push retried job"),
                }
            }
            None => {
                if let Err(e) = self.store.update_job_status(job_id, JobStatus::Failed, None) {
                    error!(job_id, error = %e, "failed to fail job");
                    return;
                }
                error!(
                    job_id,
                    attempts = self.retries.tracker().attempt_count(job_id),
                    "job failed after exhausting retries"
                );
                if let Err(e) = progress::settle_job(
                    &self.store,
                    &job.campaign_id,
                    JobStatus::Failed,
                    &self.output_dir,
                ) {
                    error!(job_id, error = %e, "failed to settle campaign after job failure");
                }
            }
        }
    }

    pub fn stats(&self) -> TimeoutStats {
        let jobs = self.store.get_all_jobs();
        TimeoutStats {
            total_jobs: jobs.len(),
            running_jobs: jobs.iter().filter(|j| j.status == JobStatus::Running).count(),
            timed_out_jobs: jobs.iter().filter(|j| j.status == JobStatus::TimedOut).count(),
            failed_jobs: jobs.iter().filter(|j| j.status == JobStatus::Failed).count(),
            check_interval_secs: self.config.check_interval.as_secs(),
        }
    }

    /// Spawn the scanning loop.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.config.check_interval.as_secs(),
                "timeout engine started"
            );
            let mut ticker = tokio::time::interval(self.config.check_interval);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => self.check_once().await,
                }
            }
            info!("timeout engine stopped");
        })
    }
}

#[cfg(test)]
#[path = "timeout_tests.rs"]
mod tests;
