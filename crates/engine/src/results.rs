// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result processor.
//!
//! Single consumer of the broker's `results` channel. Each message is
//! translated into store mutations; campaign completion triggers the CSV
//! report. Delivery is at-least-once, so everything here is idempotent per
//! `(job_id, terminal status)`: a duplicate terminal result refreshes the
//! stored fields but never moves a counter twice.

use crate::progress;
use bf_broker::Broker;
use bf_core::{BenchResult, Clock};
use bf_store::{StateStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How long a blocking result pop may wait before the loop re-checks its
/// shutdown token.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Drains the results channel and advances job and campaign state.
pub struct ResultProcessor<C: Clock> {
    store: Arc<StateStore<C>>,
    broker: Arc<dyn Broker>,
    output_dir: PathBuf,
}

impl<C: Clock> ResultProcessor<C> {
    pub fn new(
        store: Arc<StateStore<C>>,
        broker: Arc<dyn Broker>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self { store, broker, output_dir: output_dir.into() }
    }

    /// Spawn the processing loop. Exits at the next iteration after the
    /// token is cancelled; a message mid-processing completes first.
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("result processor started");
            loop {
                if shutdown.is_cancelled() {
                    break;
                }
                match self.broker.pop_result(POLL_TIMEOUT).await {
                    Ok(Some(result)) => self.process_result(result),
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = %e, "failed to pop result");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
            info!("result processor stopped");
        })
    }

    /// Apply one result message. Errors are logged, never propagated; the
    /// message counts as consumed either way (no poison-message loop).
    pub fn process_result(&self, result: BenchResult) {
        let job_id = result.job_id.clone();
        debug!(job_id = %job_id, status = %result.status, "processing result");
        if let Err(e) = self.apply(result) {
            error!(job_id = %job_id, error = %e, "error processing result");
        }
    }

    fn apply(&self, result: BenchResult) -> Result<(), StoreError> {
        let job_id = result.job_id.clone();
        let terminal = result.status.job_status();
        let mut campaign_id = result.campaign_id.clone();

        // Last writer wins for the stored fields: a retried success
        // replaces an earlier failure's diagnostics.
        self.store.save_result(result);

        let Some(job) = self.store.get_job(&job_id) else {
            warn!(job_id = %job_id, "result for unknown job");
            return Ok(());
        };
        if campaign_id.is_none() {
            campaign_id = Some(job.campaign_id.clone());
        }

        if job.status.is_terminal() {
            debug!(job_id = %job_id, "job already terminal; counters unchanged");
            return Ok(());
        }

        self.store.update_job_status(&job_id, terminal, None)?;

        if let Some(campaign_id) = campaign_id {
            progress::settle_job(&self.store, &campaign_id, terminal, &self.output_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
