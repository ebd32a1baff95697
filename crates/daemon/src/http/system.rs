// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness, reset, queue inspection, and monitoring handlers.

use super::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use bf_broker::queues::{capability_queue, worker_queue};
use bf_core::Clock;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// GET /api/health
pub async fn health<C: Clock>(State(state): State<AppState<C>>) -> Json<Value> {
    let broker_connected = state.orch.broker.ping().await;
    Json(json!({
        "status": "ok",
        "broker": { "connected": broker_connected },
        "workers": state.orch.store.get_all_workers().len(),
        "campaigns": state.orch.store.get_all_campaigns().len(),
    }))
}

/// POST /api/reset
pub async fn reset<C: Clock>(
    State(state): State<AppState<C>>,
) -> Result<Json<Value>, ApiError> {
    state
        .orch
        .store
        .reset()
        .map_err(|e| ApiError::internal(format!("failed to reset state: {e}")))?;
    Ok(Json(json!({ "status": "reset" })))
}

/// GET /api/queue/status
///
/// Sizes of every personal queue and every capability queue any worker
/// declares.
pub async fn queue_status<C: Clock>(
    State(state): State<AppState<C>>,
) -> Result<Json<Value>, ApiError> {
    let workers = state.orch.store.get_all_workers();

    let mut worker_queues = BTreeMap::new();
    for worker in &workers {
        let queue = worker_queue(&worker.worker_id);
        let len = state.orch.broker.queue_len(&queue).await?;
        worker_queues.insert(queue, len);
    }

    let mut capability_queues = BTreeMap::new();
    for worker in &workers {
        for unit in &worker.capabilities {
            let queue = capability_queue(unit);
            if !capability_queues.contains_key(&queue) {
                let len = state.orch.broker.queue_len(&queue).await?;
                capability_queues.insert(queue, len);
            }
        }
    }

    Ok(Json(json!({
        "worker_queues": worker_queues,
        "capability_queues": capability_queues,
    })))
}

/// GET /api/monitoring/stats
pub async fn monitoring_stats<C: Clock>(
    State(state): State<AppState<C>>,
) -> Json<bf_engine::MonitoringStats> {
    Json(state.orch.monitoring_stats())
}
