// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background snapshotter task.

use crate::StateStore;
use bf_core::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Default interval between periodic snapshots.
pub const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the periodic snapshot task.
///
/// Saves every `interval` until the token is cancelled. A snapshot in
/// progress at shutdown completes; the in-memory state stays authoritative
/// when a save fails.
pub fn spawn_snapshotter<C: Clock>(
    store: Arc<StateStore<C>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup does not
        // rewrite the snapshot we just loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = store.force_save() {
                        warn!(error = %e, "periodic state snapshot failed");
                    }
                }
            }
        }
    })
}
