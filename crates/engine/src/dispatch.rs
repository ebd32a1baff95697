// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job routing.
//!
//! Every freshly created job goes to exactly one queue. A worker pin wins
//! over capability routing; a job with neither is a dispatch error and is
//! never enqueued (its row stays `pending` so the caller can re-dispatch).

use bf_broker::queues::{capability_queue, worker_queue};
use bf_broker::{Broker, BrokerError};
use bf_core::{Clock, Job, JobStatus};
use bf_store::StateStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Routing failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("job {0} has no worker pin or compute unit to route on")]
    NoRoute(String),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Routes jobs to broker queues.
pub struct Dispatcher {
    broker: Arc<dyn Broker>,
}

impl Dispatcher {
    pub fn new(broker: Arc<dyn Broker>) -> Self {
        Self { broker }
    }

    /// The queue this job belongs on. First match wins: worker pin, then
    /// normalized capability queue.
    pub fn queue_for(job: &Job) -> Result<String, DispatchError> {
        if let Some(worker_id) = &job.worker_id {
            debug!(job_id = %job.job_id, worker_id, "routing to pinned worker");
            return Ok(worker_queue(worker_id));
        }
        if let Some(unit) = &job.compute_unit {
            debug!(job_id = %job.job_id, compute_unit = %unit, "routing to capability queue");
            return Ok(capability_queue(unit));
        }
        Err(DispatchError::NoRoute(job.job_id.clone()))
    }

    /// Enqueue one job, returning the queue it landed on.
    pub async fn dispatch(&self, job: &Job) -> Result<String, DispatchError> {
        let queue = Self::queue_for(job)?;
        self.broker.push_job(&queue, &job.job_id).await?;
        info!(job_id = %job.job_id, queue = %queue, "job queued");
        Ok(queue)
    }

    /// Enqueue every still-pending job of a campaign. Individual failures
    /// are logged and skipped; returns the number queued.
    pub async fn dispatch_campaign<C: Clock>(
        &self,
        store: &StateStore<C>,
        campaign_id: &str,
    ) -> usize {
        let pending: Vec<Job> = store
            .get_jobs_by_campaign(campaign_id)
            .into_iter()
            .filter(|j| j.status == JobStatus::Pending)
            .collect();

        let mut queued = 0;
        for job in &pending {
            match self.dispatch(job).await {
                Ok(_) => queued += 1,
                Err(e) => warn!(job_id = %job.job_id, error = %e, "failed to queue job"),
            }
        }
        info!(campaign_id, queued, total = pending.len(), "campaign dispatched");
        queued
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
