// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic worker identifiers.
//!
//! The same physical device must map to the same `worker_id` across agent
//! restarts so re-registration updates the existing row instead of creating a
//! duplicate. The id is derived from the device UDID when present, falling
//! back to a fingerprint of stable device attributes, and only as a last
//! resort to a random id.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Length of the hex digest kept in a worker id.
const FINGERPRINT_LEN: usize = 12;

/// Derive a deterministic worker id from a registration's `device_info` blob.
///
/// Preference order:
/// 1. `UDID` field, hashed so the id stays short.
/// 2. `DeviceName`/`Soc`/`Ram`/`DeviceOs` combination.
/// 3. Random id (device gave us nothing stable to key on).
pub fn worker_fingerprint(device_info: &Value) -> String {
    if let Some(udid) = non_empty_str(device_info, "UDID") {
        return format!("worker-{}", hash_prefix(udid));
    }

    let device_key = format!(
        "{}_{}_{}_{}",
        device_info.get("DeviceName").and_then(Value::as_str).unwrap_or(""),
        device_info.get("Soc").and_then(Value::as_str).unwrap_or(""),
        device_info.get("Ram").map(field_to_string).unwrap_or_default(),
        device_info.get("DeviceOs").and_then(Value::as_str).unwrap_or(""),
    );

    if device_key.chars().any(|c| c != '_') {
        return format!("worker-{}", hash_prefix(&device_key));
    }

    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("worker-{}", &random[..FINGERPRINT_LEN])
}

fn hash_prefix(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..FINGERPRINT_LEN].to_string()
}

fn non_empty_str<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    info.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

// Ram arrives as either a number ("16") or a string ("16 GB") depending on
// the agent version; both must fingerprint identically to themselves.
fn field_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
