// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker registration and lifecycle handlers.

use super::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::Json;
use bf_core::{Clock, WorkerStatus};
use bf_store::{RegisterAction, RegisterWorker};
use serde_json::{json, Value};

/// POST /api/register
///
/// The body is validated field by field so a missing key gets a specific
/// message rather than a generic deserialization error.
pub async fn register<C: Clock>(
    State(state): State<AppState<C>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let device_name = require_str(&body, "device_name")?;
    let ip_address = require_str(&body, "ip_address")?;
    let capabilities: Vec<String> = body
        .get("capabilities")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("missing capabilities"))?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    let device_info = body
        .get("device_info")
        .cloned()
        .ok_or_else(|| ApiError::bad_request("missing device_info"))?;

    let (worker_id, action) = state.orch.store.register_worker(RegisterWorker {
        device_name,
        ip_address,
        capabilities,
        device_info,
    });

    let status = match action {
        RegisterAction::Created => "registered",
        RegisterAction::Updated | RegisterAction::Recovered => "updated",
    };
    Ok(Json(json!({
        "worker_id": worker_id,
        "status": status,
        "action": action,
    })))
}

fn require_str(body: &Value, key: &str) -> Result<String, ApiError> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(format!("missing {key}")))
}

/// GET /api/workers
pub async fn list<C: Clock>(State(state): State<AppState<C>>) -> Json<Value> {
    let workers = state.orch.store.get_all_workers();
    Json(json!({ "count": workers.len(), "workers": workers }))
}

/// GET /api/workers/{id}
pub async fn detail<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<bf_core::Worker>, ApiError> {
    state
        .orch
        .store
        .get_worker(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("worker not found: {id}")))
}

/// PUT /api/workers/{id}/status
pub async fn set_status<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let raw = body
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::bad_request("missing status"))?;
    let status = WorkerStatus::parse(raw)
        .ok_or_else(|| ApiError::bad_request(format!("invalid status value: {raw}")))?;

    let worker = state.orch.store.update_worker_status(&id, status)?;
    Ok(Json(json!({ "worker_id": id, "status": worker.status })))
}

/// PUT /api/workers/{id}/reset, operator recovery of a faulty worker.
pub async fn reset<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let worker = state
        .orch
        .store
        .get_worker(&id)
        .ok_or_else(|| ApiError::not_found(format!("worker not found: {id}")))?;
    if worker.status != WorkerStatus::Faulty {
        return Err(ApiError::bad_request(format!(
            "worker {id} is {}, not faulty",
            worker.status
        )));
    }

    let worker = state
        .orch
        .store
        .update_worker_status(&id, WorkerStatus::Active)?;
    Ok(Json(json!({
        "worker_id": id,
        "status": worker.status,
        "action": "reset",
    })))
}

/// POST /api/workers/{id}/heartbeat
pub async fn heartbeat<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<bf_engine::HeartbeatAck>, ApiError> {
    let ack = state.orch.health.record_heartbeat(&id)?;
    Ok(Json(ack))
}

/// GET /api/workers/{id}/health
pub async fn health<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<bf_engine::WorkerHealth>, ApiError> {
    state
        .orch
        .health
        .worker_health(&id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("worker not found: {id}")))
}

/// GET /api/health/workers
pub async fn fleet_health<C: Clock>(State(state): State<AppState<C>>) -> Json<Value> {
    let fleet = state.orch.health.fleet_health();
    let healthy = fleet.iter().filter(|h| h.is_healthy).count();
    Json(json!({
        "total": fleet.len(),
        "healthy": healthy,
        "workers": fleet,
    }))
}
