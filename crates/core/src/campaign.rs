// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign record.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Campaign lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Running,
    Completed,
    Partial,
    Failed,
}

crate::simple_display! {
    CampaignStatus {
        Running => "running",
        Completed => "completed",
        Partial => "partial",
        Failed => "failed",
    }
}

impl CampaignStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CampaignStatus::Running)
    }
}

/// A user-submitted batch of benchmark jobs against one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub model_url: String,
    pub total_jobs: u32,
    pub completed_jobs: u32,
    pub failed_jobs: u32,
    pub status: CampaignStatus,
    /// Epoch ms
    pub created_at: u64,
    /// Path of the generated CSV report, set at completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_file: Option<PathBuf>,
}

/// Input for creating a campaign row.
#[derive(Debug, Clone)]
pub struct CampaignConfig {
    pub campaign_id: String,
    pub model_url: String,
    pub total_jobs: u32,
}

impl CampaignConfig {
    pub fn new(campaign_id: impl Into<String>, model_url: impl Into<String>, total_jobs: u32) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            model_url: model_url.into(),
            total_jobs,
        }
    }
}

impl Campaign {
    /// Create a fresh campaign.
    ///
    /// An empty campaign has nothing outstanding, so it is born `completed`.
    pub fn new(config: CampaignConfig, now_ms: u64) -> Self {
        let status = if config.total_jobs == 0 {
            CampaignStatus::Completed
        } else {
            CampaignStatus::Running
        };
        Self {
            campaign_id: config.campaign_id,
            model_url: config.model_url,
            total_jobs: config.total_jobs,
            completed_jobs: 0,
            failed_jobs: 0,
            status,
            created_at: now_ms,
            results_file: None,
        }
    }

    /// Number of jobs that have reached a terminal state.
    pub fn settled_jobs(&self) -> u32 {
        self.completed_jobs + self.failed_jobs
    }

    /// Whether every child job has settled.
    pub fn all_jobs_settled(&self) -> bool {
        self.total_jobs > 0 && self.settled_jobs() >= self.total_jobs
    }

    /// Generate a fresh campaign id.
    pub fn generate_id() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("campaign-{}", &hex[..12])
    }
}

#[cfg(test)]
#[path = "campaign_tests.rs"]
mod tests;
