// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job operations.

use crate::{StateStore, StoreError};
use bf_core::{Clock, Job, JobConfig, JobStatus};

impl<C: Clock> StateStore<C> {
    pub fn create_job(&self, config: JobConfig) -> Job {
        let job = Job::new(config, self.now_ms());
        self.with_state_mut(|state| {
            state.jobs.insert(job.job_id.clone(), job.clone());
        });
        job
    }

    pub fn get_job(&self, job_id: &str) -> Option<Job> {
        self.with_state(|state| state.jobs.get(job_id).cloned())
    }

    pub fn get_all_jobs(&self) -> Vec<Job> {
        self.with_state(|state| state.jobs.values().cloned().collect())
    }

    pub fn get_jobs_by_campaign(&self, campaign_id: &str) -> Vec<Job> {
        self.with_state(|state| {
            state
                .jobs
                .values()
                .filter(|j| j.campaign_id == campaign_id)
                .cloned()
                .collect()
        })
    }

    pub fn get_jobs_by_status(&self, status: JobStatus) -> Vec<Job> {
        self.with_state(|state| {
            state
                .jobs
                .values()
                .filter(|j| j.status == status)
                .cloned()
                .collect()
        })
    }

    /// Set a job's status, stamping `started_at` on the transition to
    /// running (with the claiming worker) and `completed_at` on terminal
    /// states.
    pub fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
        worker_id: Option<&str>,
    ) -> Result<Job, StoreError> {
        let now = self.now_ms();
        self.with_state_mut(|state| {
            let job = state
                .jobs
                .get_mut(job_id)
                .ok_or_else(|| StoreError::JobNotFound(job_id.to_string()))?;

            job.status = status;
            if status == JobStatus::Running {
                job.started_at = Some(now);
                if let Some(worker_id) = worker_id {
                    job.worker_id = Some(worker_id.to_string());
                }
            } else if status.is_terminal() {
                job.completed_at = Some(now);
            }
            Ok(job.clone())
        })
    }

    /// Bump a job's retry counter, returning the new count.
    pub fn increment_job_retry(&self, job_id: &str) -> Result<u32, StoreError> {
        self.with_state_mut(|state| {
            let job = state
                .jobs
                .get_mut(job_id)
                .ok_or_else(|| StoreError::JobNotFound(job_id.to_string()))?;
            job.retry_count += 1;
            Ok(job.retry_count)
        })
    }

    /// Send a timed-out job back to pending for another attempt.
    ///
    /// Clears the worker pin (the previous worker is suspect) and stamps
    /// `retry_after`; the job is eligible again once that moment passes.
    pub fn requeue_job_for_retry(
        &self,
        job_id: &str,
        retry_after_ms: u64,
    ) -> Result<Job, StoreError> {
        self.with_state_mut(|state| {
            let job = state
                .jobs
                .get_mut(job_id)
                .ok_or_else(|| StoreError::JobNotFound(job_id.to_string()))?;
            job.status = JobStatus::Pending;
            job.worker_id = None;
            job.started_at = None;
            job.retry_after = Some(retry_after_ms);
            Ok(job.clone())
        })
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
