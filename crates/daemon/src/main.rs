// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bfd`, the Benchfleet orchestrator daemon.

use anyhow::{Context, Result};
use bf_broker::{Broker, RedisBroker};
use bf_daemon::{router, AppState, Args};
use bf_engine::{Orchestrator, OrchestratorConfig};
use bf_store::StateStore;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.reset_state {
        match std::fs::remove_file(&args.state_file) {
            Ok(()) => info!(state_file = %args.state_file, "reset state file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, "failed to reset state file"),
        }
    }

    let store = Arc::new(StateStore::open(&args.state_file));
    info!(state_file = %args.state_file, "state store initialized");

    let redis = args.redis_config();
    let broker: Arc<dyn Broker> = Arc::new(
        RedisBroker::connect(&redis)
            .await
            .with_context(|| format!("connecting to Redis at {}:{}", redis.host, redis.port))?,
    );
    info!(host = %redis.host, port = redis.port, ssl = redis.ssl, "connected to Redis");

    let orch = Arc::new(Orchestrator::new(
        store,
        broker,
        bf_core::SystemClock,
        OrchestratorConfig::default(),
    ));
    orch.start();

    let app = router(AppState::new(orch.clone()));
    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "orchestrator listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("shutting down");
    orch.stop().await;
    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}
