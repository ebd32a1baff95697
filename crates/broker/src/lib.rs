// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bf-broker: Queue broker seam.
//!
//! The orchestrator talks to its queues through the [`Broker`] trait: FIFO
//! lists keyed by name for job dispatch, plus a single `results` channel
//! carrying JSON result documents. The production implementation is
//! Redis-backed ([`RedisBroker`]); tests use [`MemoryBroker`].
//!
//! Delivery is at-least-once; consumers must tolerate duplicates.

#[cfg(any(test, feature = "test-support"))]
mod memory;
pub mod queues;
mod redis_broker;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryBroker;
pub use redis_broker::{RedisBroker, RedisConfig};

use async_trait::async_trait;
use bf_core::BenchResult;
use std::time::Duration;
use thiserror::Error;

/// Broker operation failures.
///
/// The HTTP edge maps these to 5xx; background loops log and retry on the
/// next tick.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker unavailable: {0}")]
    Unavailable(String),

    #[error("malformed result payload: {0}")]
    MalformedResult(#[from] serde_json::Error),
}

/// FIFO queues keyed by name, plus the results channel.
#[async_trait]
pub trait Broker: Send + Sync + 'static {
    /// Push a job id onto the named queue.
    async fn push_job(&self, queue: &str, job_id: &str) -> Result<(), BrokerError>;

    /// Pop one job id, scanning the queues in order. Non-blocking.
    async fn pop_job(&self, queues: &[String]) -> Result<Option<String>, BrokerError>;

    /// Publish a result document on the results channel.
    async fn push_result(&self, result: &BenchResult) -> Result<(), BrokerError>;

    /// Pop one result, blocking up to `timeout`.
    async fn pop_result(&self, timeout: Duration) -> Result<Option<BenchResult>, BrokerError>;

    /// Number of entries waiting on the named queue.
    async fn queue_len(&self, queue: &str) -> Result<usize, BrokerError>;

    /// Liveness probe.
    async fn ping(&self) -> bool;
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
