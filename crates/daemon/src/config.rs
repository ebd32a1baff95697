// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line configuration for `bfd`.

use bf_broker::RedisConfig;
use clap::Parser;

/// ML model benchmarking orchestrator.
#[derive(Debug, Parser)]
#[command(name = "bfd", version, about)]
pub struct Args {
    /// Host to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP API to
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Redis host
    #[arg(long, default_value = "localhost")]
    pub redis_host: String,

    /// Redis port
    #[arg(long, default_value_t = 6379)]
    pub redis_port: u16,

    /// Redis password (for authenticated Redis)
    #[arg(long)]
    pub redis_password: Option<String>,

    /// Enable SSL/TLS for the Redis connection
    #[arg(long)]
    pub redis_ssl: bool,

    /// Path to the state persistence file
    #[arg(long, default_value = "orchestrator_state.json")]
    pub state_file: String,

    /// Remove the state file on startup (fresh start)
    #[arg(long)]
    pub reset_state: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            host: self.redis_host.clone(),
            port: self.redis_port,
            password: self.redis_password.clone(),
            ssl: self.redis_ssl,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
