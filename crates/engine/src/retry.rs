// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry bookkeeping.
//!
//! The tracker keeps an append-only retry history per job; the manager
//! consults the policy and records retries. History lives in memory only,
//! like the heartbeat map, and reseeds naturally after a restart.

use bf_core::{RetryPolicy, RetryReason, RetryRecord};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Append-only retry history per job.
#[derive(Default)]
pub struct RetryTracker {
    history: Mutex<HashMap<String, Vec<RetryRecord>>>,
}

impl RetryTracker {
    /// Record one retry for a job.
    pub fn record_retry(&self, job_id: &str, reason: RetryReason, attempt: u32, now_ms: u64) {
        self.history
            .lock()
            .entry(job_id.to_string())
            .or_default()
            .push(RetryRecord { timestamp: now_ms, reason, attempt });
        info!(job_id, reason = %reason, attempt, "recorded retry");
    }

    pub fn history(&self, job_id: &str) -> Vec<RetryRecord> {
        self.history.lock().get(job_id).cloned().unwrap_or_default()
    }

    /// Total attempts so far, counting the initial execution as attempt 1.
    pub fn attempt_count(&self, job_id: &str) -> u32 {
        self.history.lock().get(job_id).map_or(0, |h| h.len() as u32) + 1
    }

    fn totals(&self) -> (usize, usize) {
        let history = self.history.lock();
        let retries = history.values().map(Vec::len).sum();
        (history.len(), retries)
    }
}

/// A granted retry: which attempt comes next and how long to back off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryOutcome {
    /// Attempt count after this retry (the retry itself).
    pub attempt: u32,
    pub delay_secs: f64,
}

/// Retry statistics for the monitoring endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RetryStats {
    pub total_jobs_tracked: usize,
    pub total_retries: usize,
    pub policy: RetryPolicy,
}

/// Decides and records job retries with exponential backoff.
pub struct RetryManager {
    policy: RetryPolicy,
    tracker: RetryTracker,
}

impl RetryManager {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, tracker: RetryTracker::default() }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn tracker(&self) -> &RetryTracker {
        &self.tracker
    }

    /// Grant and record a retry, or refuse because attempts are exhausted.
    ///
    /// On a grant, the returned delay is the backoff before the next
    /// attempt; the jitter source is the clock's sub-second remainder.
    pub fn retry_job(
        &self,
        job_id: &str,
        reason: RetryReason,
        now_ms: u64,
    ) -> Option<RetryOutcome> {
        let attempts = self.tracker.attempt_count(job_id);
        if !self.policy.should_retry(attempts) {
            warn!(job_id, attempts, "max retries reached");
            return None;
        }

        self.tracker.record_retry(job_id, reason, attempts, now_ms);

        // 0-indexed retry number: first retry backs off by initial_delay.
        let retry_index = attempts - 1;
        let jitter_unit = (now_ms % 1000) as f64 / 1000.0;
        let delay_secs = self.policy.delay_secs(retry_index, jitter_unit);

        Some(RetryOutcome { attempt: attempts + 1, delay_secs })
    }

    pub fn stats(&self) -> RetryStats {
        let (total_jobs_tracked, total_retries) = self.tracker.totals();
        RetryStats { total_jobs_tracked, total_retries, policy: self.policy.clone() }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
