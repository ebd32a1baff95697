// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute-unit tag normalization.
//!
//! Workers declare capabilities with vendor strings like `"CPU (ONNX)"` or
//! `"Neural Engine"`; queue names must match regardless of which spelling a
//! registration used. Normalization is applied both when storing worker
//! capabilities and when routing jobs, so both sides agree on queue names.

/// Normalize a compute-unit tag for use in queue names.
///
/// Lowercases, turns spaces into underscores, and strips parentheses:
/// `"CPU (ONNX)"` → `"cpu_onnx"`.
pub fn normalize_compute_unit(unit: &str) -> String {
    unit.to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
