// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot persistence.
//!
//! The full store state is mirrored to a single JSON document. Writes go to
//! a sibling `.tmp` file and are renamed into place so a crash mid-write
//! never leaves a torn snapshot. Loading is tolerant: a missing file starts
//! fresh, and a malformed one is logged and treated as empty; the broker
//! queues and re-registration rebuild the interesting state anyway.

use crate::StoreState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk snapshot document.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    #[serde(flatten)]
    state: StoreState,
    last_saved: DateTime<Utc>,
}

/// Write `state` to `path` atomically (write-temp-then-rename).
pub fn save(path: &Path, state: &StoreState) -> Result<(), SnapshotError> {
    let doc = Snapshot { state: state.clone(), last_saved: Utc::now() };
    let json = serde_json::to_string_pretty(&doc)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "state snapshot saved");
    Ok(())
}

/// Load the snapshot at `path`, or an empty state when absent or malformed.
pub fn load(path: &Path) -> StoreState {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no existing state file, starting fresh");
            return StoreState::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read state file, starting fresh");
            return StoreState::default();
        }
    };

    match serde_json::from_str::<Snapshot>(&data) {
        Ok(snapshot) => {
            tracing::info!(path = %path.display(), "loaded state snapshot");
            snapshot.state
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse state file, starting fresh");
            StoreState::default()
        }
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
