// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Benchmark result messages.
//!
//! Results arrive from workers as JSON documents on the broker's results
//! channel. The metric fields keep their CamelCase wire names; all of them
//! are optional because failed runs report only a remark.

use crate::job::JobStatus;
use serde::{Deserialize, Serialize};

/// Terminal outcome reported by a worker.
///
/// Wire spelling is capitalized (`"Complete"` / `"Failed"`), matching the
/// result documents workers publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Complete,
    Failed,
}

crate::simple_display! {
    ResultStatus {
        Complete => "Complete",
        Failed => "Failed",
    }
}

impl ResultStatus {
    /// The job status a result of this kind settles the job into.
    pub fn job_status(self) -> JobStatus {
        match self {
            ResultStatus::Complete => JobStatus::Complete,
            ResultStatus::Failed => JobStatus::Failed,
        }
    }
}

/// Measurement fields of a benchmark run.
///
/// All numerics are optional; missing fields serialize as empty cells in the
/// CSV report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "FileName", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "FileSize", default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(rename = "ComputeUnits", default, skip_serializing_if = "Option::is_none")]
    pub compute_units: Option<String>,

    #[serde(rename = "LoadMsMin", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_min: Option<f64>,
    #[serde(rename = "LoadMsMax", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_max: Option<f64>,
    #[serde(rename = "LoadMsMedian", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_median: Option<f64>,
    #[serde(rename = "LoadMsAverage", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_average: Option<f64>,
    #[serde(rename = "LoadMsStdDev", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_std_dev: Option<f64>,
    #[serde(rename = "LoadMsFirst", default, skip_serializing_if = "Option::is_none")]
    pub load_ms_first: Option<f64>,
    #[serde(rename = "PeakLoadRamUsage", default, skip_serializing_if = "Option::is_none")]
    pub peak_load_ram_usage: Option<f64>,

    #[serde(rename = "InferenceMsMin", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_min: Option<f64>,
    #[serde(rename = "InferenceMsMax", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_max: Option<f64>,
    #[serde(rename = "InferenceMsMedian", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_median: Option<f64>,
    #[serde(rename = "InferenceMsAverage", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_average: Option<f64>,
    #[serde(rename = "InferenceMsStdDev", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_std_dev: Option<f64>,
    #[serde(rename = "InferenceMsFirst", default, skip_serializing_if = "Option::is_none")]
    pub inference_ms_first: Option<f64>,
    #[serde(rename = "PeakInferenceRamUsage", default, skip_serializing_if = "Option::is_none")]
    pub peak_inference_ram_usage: Option<f64>,
}

/// Outcome of one job execution, keyed by `job_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchResult {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    pub status: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// Failure diagnostic from the worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(flatten)]
    pub metrics: Metrics,
    /// Epoch ms when the store accepted this result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<u64>,
}

impl BenchResult {
    /// A minimal result document for a given outcome.
    pub fn new(job_id: impl Into<String>, status: ResultStatus) -> Self {
        Self {
            job_id: job_id.into(),
            campaign_id: None,
            status,
            worker_id: None,
            remark: None,
            metrics: Metrics::default(),
            saved_at: None,
        }
    }

    crate::setters! {
        set {
            metrics: Metrics,
        }
        option {
            campaign_id: String,
            worker_id: String,
            remark: String,
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
