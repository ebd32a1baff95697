// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory broker for tests.

use crate::queues::RESULTS_QUEUE;
use crate::{Broker, BrokerError};
use async_trait::async_trait;
use bf_core::BenchResult;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

/// Broker over process-local queues. FIFO, at-least-once by construction
/// (nothing redelivers, but consumers must not assume that).
#[derive(Clone, Default)]
pub struct MemoryBroker {
    queues: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all queue lengths, for assertions.
    pub fn queue_sizes(&self) -> HashMap<String, usize> {
        self.queues
            .lock()
            .iter()
            .map(|(name, q)| (name.clone(), q.len()))
            .collect()
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn push_job(&self, queue: &str, job_id: &str) -> Result<(), BrokerError> {
        self.queues
            .lock()
            .entry(queue.to_string())
            .or_default()
            .push_front(job_id.to_string());
        Ok(())
    }

    async fn pop_job(&self, queues: &[String]) -> Result<Option<String>, BrokerError> {
        let mut guard = self.queues.lock();
        for queue in queues {
            if let Some(q) = guard.get_mut(queue) {
                if let Some(job_id) = q.pop_back() {
                    return Ok(Some(job_id));
                }
            }
        }
        Ok(None)
    }

    async fn push_result(&self, result: &BenchResult) -> Result<(), BrokerError> {
        let payload = serde_json::to_string(result)?;
        self.queues
            .lock()
            .entry(RESULTS_QUEUE.to_string())
            .or_default()
            .push_front(payload);
        Ok(())
    }

    async fn pop_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<BenchResult>, BrokerError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let popped = self
                .queues
                .lock()
                .get_mut(RESULTS_QUEUE)
                .and_then(|q| q.pop_back());
            match popped {
                Some(payload) => return Ok(Some(serde_json::from_str(&payload)?)),
                None if tokio::time::Instant::now() >= deadline => return Ok(None),
                None => tokio::time::sleep(Duration::from_millis(5)).await,
            }
        }
    }

    async fn queue_len(&self, queue: &str) -> Result<usize, BrokerError> {
        Ok(self.queues.lock().get(queue).map_or(0, VecDeque::len))
    }

    async fn ping(&self) -> bool {
        true
    }
}
