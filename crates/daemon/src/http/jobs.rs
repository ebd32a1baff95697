// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job inspection handler.

use super::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::Json;
use bf_core::Clock;
use serde_json::{json, Value};

/// GET /api/jobs/{id}: job row plus its result, when one has arrived.
pub async fn detail<C: Clock>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let job = state
        .orch
        .store
        .get_job(&id)
        .ok_or_else(|| ApiError::not_found(format!("job not found: {id}")))?;
    let result = state.orch.store.get_result(&id);
    Ok(Json(json!({ "job": job, "result": result })))
}
