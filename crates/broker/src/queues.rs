// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue naming conventions.
//!
//! Two families of job queues exist: one per worker (`jobs:{worker_id}`)
//! for pinned jobs, and one per normalized compute unit
//! (`jobs:capability:{unit}`) for the shared pool. Results ride a single
//! `results` channel.

use bf_core::normalize_compute_unit;

/// Name of the results channel.
pub const RESULTS_QUEUE: &str = "results";

/// Personal queue for jobs pinned to one worker.
pub fn worker_queue(worker_id: &str) -> String {
    format!("jobs:{worker_id}")
}

/// Shared pool queue for a compute unit (normalized from any spelling).
pub fn capability_queue(compute_unit: &str) -> String {
    format!("jobs:capability:{}", normalize_compute_unit(compute_unit))
}

/// Queues a worker polls, in priority order: the personal queue first, then
/// one capability queue per declared unit in registration order.
pub fn polling_order(worker_id: &str, capabilities: &[String]) -> Vec<String> {
    let mut queues = Vec::with_capacity(capabilities.len() + 1);
    queues.push(worker_queue(worker_id));
    queues.extend(capabilities.iter().map(|c| capability_queue(c)));
    queues
}

#[cfg(test)]
#[path = "queues_tests.rs"]
mod tests;
