// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[parameterized(
    plain_cpu = { "CPU", "cpu" },
    gpu = { "GPU", "gpu" },
    parenthesized_backend = { "CPU (ONNX)", "cpu_onnx" },
    neural_engine = { "Neural Engine", "neural_engine" },
    already_normalized = { "cpu_onnx", "cpu_onnx" },
    mixed_case = { "OpenVINO", "openvino" },
    empty = { "", "" },
)]
fn normalizes(raw: &str, expected: &str) {
    assert_eq!(normalize_compute_unit(raw), expected);
}

proptest! {
    #[test]
    fn normalization_is_idempotent(s in "[A-Za-z0-9 ()_-]{0,24}") {
        let once = normalize_compute_unit(&s);
        let twice = normalize_compute_unit(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_has_no_spaces_or_parens(s in ".{0,32}") {
        let n = normalize_compute_unit(&s);
        prop_assert!(!n.contains(' '));
        prop_assert!(!n.contains('('));
        prop_assert!(!n.contains(')'));
    }
}
