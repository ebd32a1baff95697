// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generated CSV listing and download handlers.

use super::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use bf_core::Clock;
use bf_engine::report;
use serde_json::{json, Value};

/// GET /api/results/files
pub async fn list_files<C: Clock>(
    State(state): State<AppState<C>>,
) -> Result<Json<Value>, ApiError> {
    let files = report::list_reports(&state.orch.config().output_dir)
        .map_err(|e| ApiError::internal(format!("failed to list reports: {e}")))?;
    Ok(Json(json!({ "count": files.len(), "files": files })))
}

/// GET /api/results/download/{name}
pub async fn download<C: Clock>(
    State(state): State<AppState<C>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    // The name must be a bare file name; anything path-like is traversal.
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ApiError::bad_request("invalid file name"));
    }

    let path = state.orch.config().output_dir.join(&name);
    let content = std::fs::read_to_string(&path)
        .map_err(|_| ApiError::not_found(format!("file not found: {name}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        content,
    ))
}
