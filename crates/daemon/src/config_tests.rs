// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use clap::Parser;

#[test]
fn defaults_match_documented_values() {
    let args = Args::parse_from(["bfd"]);
    assert_eq!(args.host, "0.0.0.0");
    assert_eq!(args.port, 5000);
    assert_eq!(args.redis_host, "localhost");
    assert_eq!(args.redis_port, 6379);
    assert!(args.redis_password.is_none());
    assert!(!args.redis_ssl);
    assert_eq!(args.state_file, "orchestrator_state.json");
    assert!(!args.reset_state);
    assert!(!args.debug);
}

#[test]
fn flags_parse() {
    let args = Args::parse_from([
        "bfd",
        "--host",
        "127.0.0.1",
        "--port",
        "8080",
        "--redis-host",
        "cache.internal",
        "--redis-port",
        "6380",
        "--redis-password",
        "hunter2",
        "--redis-ssl",
        "--state-file",
        "/var/lib/bf/state.json",
        "--reset-state",
        "--debug",
    ]);
    assert_eq!(args.bind_addr(), "127.0.0.1:8080");
    assert!(args.redis_ssl);
    assert!(args.reset_state);

    let redis = args.redis_config();
    assert_eq!(redis.host, "cache.internal");
    assert_eq!(redis.port, 6380);
    assert_eq!(redis.password.as_deref(), Some("hunter2"));
    assert!(redis.ssl);
}
