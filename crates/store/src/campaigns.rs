// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign operations.

use crate::{StateStore, StoreError};
use bf_core::{Campaign, CampaignConfig, CampaignStatus, Clock};
use std::path::PathBuf;
use tracing::warn;

/// Requested changes to a campaign's progress counters and status.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignProgress {
    pub increment_completed: bool,
    pub increment_failed: bool,
    pub status: Option<CampaignStatus>,
}

impl<C: Clock> StateStore<C> {
    pub fn create_campaign(&self, config: CampaignConfig) -> Campaign {
        let campaign = Campaign::new(config, self.now_ms());
        self.with_state_mut(|state| {
            state
                .campaigns
                .insert(campaign.campaign_id.clone(), campaign.clone());
        });
        campaign
    }

    pub fn get_campaign(&self, campaign_id: &str) -> Option<Campaign> {
        self.with_state(|state| state.campaigns.get(campaign_id).cloned())
    }

    pub fn get_all_campaigns(&self) -> Vec<Campaign> {
        self.with_state(|state| state.campaigns.values().cloned().collect())
    }

    /// Apply counter increments and/or a status change atomically.
    ///
    /// Counters never move past `total_jobs`, and a terminal campaign is
    /// frozen: late increments are dropped with a warning rather than
    /// corrupting a finished report.
    pub fn update_campaign_progress(
        &self,
        campaign_id: &str,
        progress: CampaignProgress,
    ) -> Result<Campaign, StoreError> {
        self.with_state_mut(|state| {
            let campaign = state
                .campaigns
                .get_mut(campaign_id)
                .ok_or_else(|| StoreError::CampaignNotFound(campaign_id.to_string()))?;

            if progress.increment_completed || progress.increment_failed {
                if campaign.status.is_terminal() || campaign.all_jobs_settled() {
                    warn!(
                        campaign_id,
                        status = %campaign.status,
                        "dropping counter increment for settled campaign"
                    );
                } else if progress.increment_completed {
                    campaign.completed_jobs += 1;
                } else {
                    campaign.failed_jobs += 1;
                }
            }

            if let Some(status) = progress.status {
                if campaign.status.is_terminal() {
                    warn!(campaign_id, "ignoring status change on terminal campaign");
                } else {
                    campaign.status = status;
                }
            }

            Ok(campaign.clone())
        })
    }

    /// Record the path of the generated CSV report.
    pub fn attach_results_file(
        &self,
        campaign_id: &str,
        path: PathBuf,
    ) -> Result<(), StoreError> {
        self.with_state_mut(|state| {
            let campaign = state
                .campaigns
                .get_mut(campaign_id)
                .ok_or_else(|| StoreError::CampaignNotFound(campaign_id.to_string()))?;
            campaign.results_file = Some(path);
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "campaigns_tests.rs"]
mod tests;
