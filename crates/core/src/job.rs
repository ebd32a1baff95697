// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and state machine.

use serde::{Deserialize, Serialize};

/// Default per-job execution timeout (one hour).
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 3600;

/// Job lifecycle states.
///
/// `TimedOut` is intermediate: the timeout engine either sends the job back
/// to `Pending` (retry) or settles it as `Failed` once attempts run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Complete,
    Failed,
    TimedOut,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Complete => "complete",
        Failed => "failed",
        TimedOut => "timed_out",
        Cancelled => "cancelled",
    }
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed | JobStatus::Cancelled)
    }
}

/// One (model, compute-unit[, worker]) benchmark execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub campaign_id: String,
    pub model_url: String,
    /// Capability routing target (raw registration spelling).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_unit: Option<String>,
    /// Static pin; when set the job only goes to this worker's queue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_inference_runs: Option<u32>,
    /// Worker-interpreted warm-up hint; the core carries it opaquely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_warmups: Option<u32>,
    pub timeout_seconds: u64,
    pub status: JobStatus,
    /// Epoch ms
    pub submitted_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
    #[serde(default)]
    pub retry_count: u32,
    /// Epoch ms before which workers must not claim this job after a retry.
    /// The job is re-pushed immediately; the delay is honored at pop time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// Input for creating a job row.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub job_id: String,
    pub campaign_id: String,
    pub model_url: String,
    pub compute_unit: Option<String>,
    pub worker_id: Option<String>,
    pub num_inference_runs: Option<u32>,
    pub num_warmups: Option<u32>,
    pub timeout_seconds: u64,
}

impl JobConfig {
    pub fn new(
        job_id: impl Into<String>,
        campaign_id: impl Into<String>,
        model_url: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            campaign_id: campaign_id.into(),
            model_url: model_url.into(),
            compute_unit: None,
            worker_id: None,
            num_inference_runs: None,
            num_warmups: None,
            timeout_seconds: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }

    crate::setters! {
        set {
            timeout_seconds: u64,
        }
        option {
            compute_unit: String,
            worker_id: String,
            num_inference_runs: u32,
            num_warmups: u32,
        }
    }
}

impl Job {
    /// Create a pending job.
    pub fn new(config: JobConfig, now_ms: u64) -> Self {
        Self {
            job_id: config.job_id,
            campaign_id: config.campaign_id,
            model_url: config.model_url,
            compute_unit: config.compute_unit,
            worker_id: config.worker_id,
            num_inference_runs: config.num_inference_runs,
            num_warmups: config.num_warmups,
            timeout_seconds: config.timeout_seconds,
            status: JobStatus::Pending,
            submitted_at: now_ms,
            started_at: None,
            completed_at: None,
            retry_count: 0,
            retry_after: None,
        }
    }

    /// Conventional job id for the i-th job of a campaign.
    pub fn id_for(campaign_id: &str, index: usize) -> String {
        format!("{campaign_id}-job-{index}")
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Seconds the job has been running, if it is running.
    pub fn running_secs(&self, now_ms: u64) -> Option<u64> {
        if self.status != JobStatus::Running {
            return None;
        }
        let started = self.started_at?;
        Some(now_ms.saturating_sub(started) / 1000)
    }

    /// Whether the job has exceeded its execution timeout.
    pub fn is_overdue(&self, now_ms: u64) -> bool {
        self.running_secs(now_ms)
            .is_some_and(|elapsed| elapsed > self.timeout_seconds)
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            job_id: String = "campaign-test-job-0",
            campaign_id: String = "campaign-test",
            model_url: String = "https://models.test/model.onnx",
        }
        set {
            timeout_seconds: u64 = DEFAULT_JOB_TIMEOUT_SECS,
            status: JobStatus = JobStatus::Pending,
            submitted_at: u64 = 1_000_000,
            retry_count: u32 = 0,
        }
        option {
            compute_unit: String = Some("cpu".to_string()),
            worker_id: String = None,
            num_inference_runs: u32 = None,
            num_warmups: u32 = None,
            started_at: u64 = None,
            completed_at: u64 = None,
            retry_after: u64 = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
