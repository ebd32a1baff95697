// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign submission and inspection handlers.

use super::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use bf_core::{Campaign, CampaignConfig, Clock, Job, JobConfig};
use serde::Deserialize;
use serde_json::{json, Value};

/// One job request inside a campaign submission.
#[derive(Debug, Deserialize)]
pub struct JobSpec {
    pub compute_unit: Option<String>,
    pub worker_id: Option<String>,
    pub num_inference_runs: Option<u32>,
    pub num_warmups: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

/// POST /api/campaigns
///
/// Creates the campaign row and its job rows, then dispatches every job.
/// A broker failure leaves the job rows `pending` and surfaces as 502;
/// re-submission is safe because dispatch only queues pending jobs.
pub async fn create<C: Clock>(
    State(state): State<AppState<C>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let model_url = body
        .get("model_url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing model_url"))?
        .to_string();
    let specs: Vec<JobSpec> = match body.get("jobs") {
        Some(jobs) => serde_json::from_value(jobs.clone())
            .map_err(|e| ApiError::bad_request(format!("invalid jobs: {e}")))?,
        None => return Err(ApiError::bad_request("missing jobs")),
    };
    for (i, spec) in specs.iter().enumerate() {
        if spec.compute_unit.is_none() && spec.worker_id.is_none() {
            return Err(ApiError::bad_request(format!(
                "job {i} needs a compute_unit or worker_id"
            )));
        }
    }

    let campaign_id = Campaign::generate_id();
    let campaign = state.orch.store.create_campaign(CampaignConfig::new(
        &campaign_id,
        &model_url,
        specs.len() as u32,
    ));

    let mut jobs = Vec::with_capacity(specs.len());
    for (i, spec) in specs.into_iter().enumerate() {
        let mut config = JobConfig::new(Job::id_for(&campaign_id, i), &campaign_id, &model_url);
        config.compute_unit = spec.compute_unit;
        config.worker_id = spec.worker_id;
        config.num_inference_runs = spec.num_inference_runs;
        config.num_warmups = spec.num_warmups;
        if let Some(timeout) = spec.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        jobs.push(state.orch.store.create_job(config));
    }

    for job in &jobs {
        state
            .orch
            .dispatcher
            .dispatch(job)
            .await
            .map_err(|e| match e {
                bf_engine::DispatchError::NoRoute(id) => {
                    ApiError::bad_request(format!("job {id} is not routable"))
                }
                bf_engine::DispatchError::Broker(e) => e.into(),
            })?;
    }

    Ok(Json(json!({
        "campaign_id": campaign_id,
        "total_jobs": campaign.total_jobs,
        "status": campaign.status,
        "jobs": jobs
            .iter()
            .map(|j| json!({
                "job_id": j.job_id,
                "compute_unit": j.compute_unit,
                "status": j.status,
            }))
            .collect::<Vec<_>>(),
    })))
}

/// GET /api/campaigns
pub async fn list<C: Clock>(State(state): State<AppState<C>>) -> Json<Value> {
    let campaigns = state.orch.store.get_all_campaigns();
    Json(json!({ "count": campaigns.len(), "campaigns": campaigns }))
}

/// GET /api/campaigns/{id}
pub async fn detail<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let campaign = state
        .orch
        .store
        .get_campaign(&id)
        .ok_or_else(|| ApiError::not_found(format!("campaign not found: {id}")))?;
    let jobs = state.orch.store.get_jobs_by_campaign(&id);
    Ok(Json(json!({ "campaign": campaign, "jobs": jobs })))
}

/// GET /api/campaigns/{id}/results downloads the campaign's CSV report.
pub async fn results_csv<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = state
        .orch
        .store
        .get_campaign(&id)
        .ok_or_else(|| ApiError::not_found(format!("campaign not found: {id}")))?;
    let path = campaign
        .results_file
        .ok_or_else(|| ApiError::not_found(format!("no results for campaign {id}")))?;

    let content = std::fs::read_to_string(&path)
        .map_err(|e| ApiError::not_found(format!("results file unreadable: {e}")))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("{id}_results.csv"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    ))
}
