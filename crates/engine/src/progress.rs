// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign settlement shared by the result processor and timeout engine.
//!
//! Both paths that settle a job (a terminal result, or a timeout running out
//! of retries) funnel through here so the campaign counters stay idempotent
//! and the finishing touches (status flip, CSV report, forced snapshot)
//! happen exactly once regardless of which loop settled the last job.

use crate::report;
use bf_core::{CampaignStatus, Clock, JobStatus};
use bf_store::{CampaignProgress, StateStore, StoreError};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Count one settled job against its campaign and finalize the campaign if
/// that was the last one outstanding.
pub(crate) fn settle_job<C: Clock>(
    store: &Arc<StateStore<C>>,
    campaign_id: &str,
    outcome: JobStatus,
    output_dir: &Path,
) -> Result<(), StoreError> {
    let progress = match outcome {
        JobStatus::Complete => {
            CampaignProgress { increment_completed: true, ..Default::default() }
        }
        JobStatus::Failed => {
            CampaignProgress { increment_failed: true, ..Default::default() }
        }
        other => {
            warn!(campaign_id, status = %other, "ignoring non-terminal settle");
            return Ok(());
        }
    };

    let campaign = store.update_campaign_progress(campaign_id, progress)?;
    if campaign.status == CampaignStatus::Running && campaign.all_jobs_settled() {
        finalize_campaign(store, campaign_id, output_dir)?;
    }
    Ok(())
}

/// Flip a fully-settled campaign to completed and emit its CSV report.
fn finalize_campaign<C: Clock>(
    store: &Arc<StateStore<C>>,
    campaign_id: &str,
    output_dir: &Path,
) -> Result<(), StoreError> {
    let campaign = store.update_campaign_progress(
        campaign_id,
        CampaignProgress { status: Some(CampaignStatus::Completed), ..Default::default() },
    )?;
    info!(
        campaign_id,
        completed = campaign.completed_jobs,
        failed = campaign.failed_jobs,
        "campaign complete"
    );

    let rows = store.query_results_for_csv(campaign_id);
    if rows.is_empty() {
        warn!(campaign_id, "no results to report");
    } else {
        match report::write_campaign_csv(output_dir, campaign_id, &rows) {
            Ok(path) => store.attach_results_file(campaign_id, path)?,
            Err(e) => error!(campaign_id, error = %e, "failed to write campaign CSV"),
        }
    }

    if let Err(e) = store.force_save() {
        warn!(error = %e, "snapshot after campaign completion failed");
    }
    Ok(())
}
