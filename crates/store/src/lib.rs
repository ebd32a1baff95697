// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bf-store: In-memory state store with JSON snapshot persistence.
//!
//! Single source of truth for workers, campaigns, jobs, and results. All
//! mutations are serialized under one mutex; readers get cloned records.
//! A background task snapshots the full state to disk every 30 seconds
//! (see [`persist`]); snapshots are written atomically and reloaded at
//! startup.

mod campaigns;
mod jobs;
pub mod persist;
mod results;
pub mod snapshot;
mod workers;

pub use campaigns::CampaignProgress;
pub use results::ResultRow;
pub use snapshot::SnapshotError;
pub use workers::{RegisterAction, RegisterWorker};

use bf_core::{BenchResult, Campaign, Clock, Job, SystemClock, Worker};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Mutating calls are total except where an entity is missing or a worker
/// transition is refused by the state machine.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("worker not found: {0}")]
    WorkerNotFound(String),

    #[error("campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] bf_core::InvalidTransition),
}

/// The four entity maps mirrored by the persistence snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub workers: HashMap<String, Worker>,
    pub campaigns: HashMap<String, Campaign>,
    pub jobs: HashMap<String, Job>,
    pub results: HashMap<String, BenchResult>,
}

/// Thread-safe registry of workers, campaigns, jobs, and results.
pub struct StateStore<C: Clock = SystemClock> {
    state: Mutex<StoreState>,
    snapshot_path: PathBuf,
    clock: C,
}

impl StateStore<SystemClock> {
    /// Open a store backed by `snapshot_path`, loading any existing snapshot.
    pub fn open(snapshot_path: impl Into<PathBuf>) -> Self {
        Self::open_with_clock(snapshot_path, SystemClock)
    }
}

impl<C: Clock> StateStore<C> {
    pub fn open_with_clock(snapshot_path: impl Into<PathBuf>, clock: C) -> Self {
        let snapshot_path = snapshot_path.into();
        let state = snapshot::load(&snapshot_path);
        Self { state: Mutex::new(state), snapshot_path, clock }
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        f(&self.state.lock())
    }

    pub(crate) fn with_state_mut<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        f(&mut self.state.lock())
    }

    /// Synchronously snapshot the current state to disk.
    ///
    /// The state is cloned under the guard; serialization, the write, and
    /// the rename all happen outside it.
    pub fn force_save(&self) -> Result<(), SnapshotError> {
        let state = self.state.lock().clone();
        snapshot::save(&self.snapshot_path, &state)
    }

    /// Wipe all in-memory state and rewrite the (now empty) snapshot.
    pub fn reset(&self) -> Result<(), SnapshotError> {
        *self.state.lock() = StoreState::default();
        self.force_save()
    }

    /// Path of the snapshot file this store persists to.
    pub fn snapshot_path(&self) -> &std::path::Path {
        &self.snapshot_path
    }
}
