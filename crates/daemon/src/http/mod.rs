// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP API under `/api`.
//!
//! Handlers hold no state of their own: everything reaches them through
//! [`AppState`], which the composition root builds at startup.

mod campaigns;
mod error;
mod jobs;
mod reports;
mod system;
mod workers;

pub use error::ApiError;

use axum::routing::{get, post, put};
use axum::Router;
use bf_core::Clock;
use bf_engine::Orchestrator;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler dependencies.
pub struct AppState<C: Clock> {
    pub orch: Arc<Orchestrator<C>>,
}

impl<C: Clock> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self { orch: self.orch.clone() }
    }
}

impl<C: Clock> AppState<C> {
    pub fn new(orch: Arc<Orchestrator<C>>) -> Self {
        Self { orch }
    }
}

/// Build the `/api` router.
pub fn router<C: Clock>(state: AppState<C>) -> Router {
    let api = Router::new()
        .route("/health", get(system::health::<C>))
        .route("/reset", post(system::reset::<C>))
        .route("/queue/status", get(system::queue_status::<C>))
        .route("/monitoring/stats", get(system::monitoring_stats::<C>))
        .route("/register", post(workers::register::<C>))
        .route("/workers", get(workers::list::<C>))
        .route("/workers/{id}", get(workers::detail::<C>))
        .route("/workers/{id}/status", put(workers::set_status::<C>))
        .route("/workers/{id}/reset", put(workers::reset::<C>))
        .route("/workers/{id}/heartbeat", post(workers::heartbeat::<C>))
        .route("/workers/{id}/health", get(workers::health::<C>))
        .route("/health/workers", get(workers::fleet_health::<C>))
        .route("/campaigns", post(campaigns::create::<C>).get(campaigns::list::<C>))
        .route("/campaigns/{id}", get(campaigns::detail::<C>))
        .route("/campaigns/{id}/results", get(campaigns::results_csv::<C>))
        .route("/jobs/{id}", get(jobs::detail::<C>))
        .route("/results/files", get(reports::list_files::<C>))
        .route("/results/download/{name}", get(reports::download::<C>));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
