// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed broker.
//!
//! Queues are Redis lists: LPUSH to enqueue, RPOP to drain (FIFO), BRPOP on
//! the results channel so the result processor can block with a short
//! timeout instead of spinning.

use crate::queues::RESULTS_QUEUE;
use crate::{Broker, BrokerError};
use async_trait::async_trait;
use bf_core::BenchResult;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`RedisBroker`].
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub ssl: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 6379, password: None, ssl: false }
    }
}

impl RedisConfig {
    fn url(&self) -> String {
        let scheme = if self.ssl { "rediss" } else { "redis" };
        match &self.password {
            Some(password) => {
                format!("{scheme}://:{password}@{}:{}/", self.host, self.port)
            }
            None => format!("{scheme}://{}:{}/", self.host, self.port),
        }
    }
}

/// Broker over a shared Redis connection manager.
///
/// The manager reconnects internally, so a Redis restart shows up as a few
/// failed operations rather than a dead client.
#[derive(Clone)]
pub struct RedisBroker {
    conn: ConnectionManager,
}

impl RedisBroker {
    /// Connect to Redis. Fails only when the initial connection cannot be
    /// established; later outages surface per-operation.
    pub async fn connect(config: &RedisConfig) -> Result<Self, BrokerError> {
        let client = redis::Client::open(config.url())
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn unavailable(e: redis::RedisError) -> BrokerError {
    BrokerError::Unavailable(e.to_string())
}

#[async_trait]
impl Broker for RedisBroker {
    async fn push_job(&self, queue: &str, job_id: &str) -> Result<(), BrokerError> {
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(queue, job_id)
            .await
            .map_err(unavailable)?;
        debug!(queue, job_id, "pushed job");
        Ok(())
    }

    async fn pop_job(&self, queues: &[String]) -> Result<Option<String>, BrokerError> {
        let mut conn = self.conn.clone();
        for queue in queues {
            let popped: Option<String> =
                conn.rpop(queue, None).await.map_err(unavailable)?;
            if let Some(job_id) = popped {
                debug!(queue, job_id, "popped job");
                return Ok(Some(job_id));
            }
        }
        Ok(None)
    }

    async fn push_result(&self, result: &BenchResult) -> Result<(), BrokerError> {
        let payload = serde_json::to_string(result)?;
        let mut conn = self.conn.clone();
        conn.lpush::<_, _, ()>(RESULTS_QUEUE, payload)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn pop_result(
        &self,
        timeout: Duration,
    ) -> Result<Option<BenchResult>, BrokerError> {
        let mut conn = self.conn.clone();
        let popped: Option<(String, String)> = conn
            .brpop(RESULTS_QUEUE, timeout.as_secs_f64())
            .await
            .map_err(unavailable)?;
        match popped {
            Some((_, payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn queue_len(&self, queue: &str) -> Result<usize, BrokerError> {
        let mut conn = self.conn.clone();
        conn.llen(queue).await.map_err(unavailable)
    }

    async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}
