// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result storage and the CSV join query.

use crate::StateStore;
use bf_core::{BenchResult, Clock};
use serde::Serialize;

/// One row of the per-campaign CSV report: result × job × worker.
///
/// `None` serializes as an empty cell. `created_utc` and `upload_id` are
/// upstream-pipeline columns the orchestrator never fills.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultRow {
    #[serde(rename = "CreatedUtc")]
    pub created_utc: Option<String>,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "UploadId")]
    pub upload_id: Option<String>,
    #[serde(rename = "FileName")]
    pub file_name: Option<String>,
    #[serde(rename = "FileSize")]
    pub file_size: Option<u64>,
    #[serde(rename = "DeviceName")]
    pub device_name: Option<String>,
    #[serde(rename = "DeviceYear")]
    pub device_year: Option<String>,
    #[serde(rename = "Soc")]
    pub soc: Option<String>,
    #[serde(rename = "Ram")]
    pub ram: Option<f64>,
    #[serde(rename = "DiscreteGpu")]
    pub discrete_gpu: Option<String>,
    #[serde(rename = "VRam")]
    pub vram: Option<String>,
    #[serde(rename = "DeviceOs")]
    pub device_os: Option<String>,
    #[serde(rename = "DeviceOsVersion")]
    pub device_os_version: Option<String>,
    #[serde(rename = "ComputeUnits")]
    pub compute_units: Option<String>,
    #[serde(rename = "LoadMsMedian")]
    pub load_ms_median: Option<f64>,
    #[serde(rename = "LoadMsStdDev")]
    pub load_ms_std_dev: Option<f64>,
    #[serde(rename = "LoadMsAverage")]
    pub load_ms_average: Option<f64>,
    #[serde(rename = "LoadMsFirst")]
    pub load_ms_first: Option<f64>,
    #[serde(rename = "PeakLoadRamUsage")]
    pub peak_load_ram_usage: Option<f64>,
    #[serde(rename = "InferenceMsMedian")]
    pub inference_ms_median: Option<f64>,
    #[serde(rename = "InferenceMsStdDev")]
    pub inference_ms_std_dev: Option<f64>,
    #[serde(rename = "InferenceMsAverage")]
    pub inference_ms_average: Option<f64>,
    #[serde(rename = "InferenceMsFirst")]
    pub inference_ms_first: Option<f64>,
    #[serde(rename = "PeakInferenceRamUsage")]
    pub peak_inference_ram_usage: Option<f64>,
    #[serde(rename = "JobId")]
    pub job_id: String,
}

impl<C: Clock> StateStore<C> {
    /// Save a result, stamping `saved_at`. Last writer wins: a retried
    /// success overwrites an earlier failure's diagnostic fields.
    pub fn save_result(&self, mut result: BenchResult) {
        result.saved_at = Some(self.now_ms());
        self.with_state_mut(|state| {
            state.results.insert(result.job_id.clone(), result);
        });
    }

    pub fn get_result(&self, job_id: &str) -> Option<BenchResult> {
        self.with_state(|state| state.results.get(job_id).cloned())
    }

    /// Join results with their jobs and workers for the campaign report.
    ///
    /// Results whose job is missing or belongs to another campaign are
    /// skipped; a missing worker leaves the device columns empty.
    pub fn query_results_for_csv(&self, campaign_id: &str) -> Vec<ResultRow> {
        self.with_state(|state| {
            state
                .results
                .iter()
                .filter_map(|(job_id, result)| {
                    let job = state.jobs.get(job_id)?;
                    if job.campaign_id != campaign_id {
                        return None;
                    }
                    let worker = job
                        .worker_id
                        .as_deref()
                        .or(result.worker_id.as_deref())
                        .and_then(|id| state.workers.get(id));

                    let m = &result.metrics;
                    Some(ResultRow {
                        created_utc: None,
                        status: result.status.to_string(),
                        upload_id: None,
                        file_name: m.file_name.clone(),
                        file_size: m.file_size,
                        device_name: worker.map(|w| w.device_name.clone()),
                        device_year: worker.and_then(|w| w.device_year.clone()),
                        soc: worker.and_then(|w| w.soc.clone()),
                        ram: worker.and_then(|w| w.ram_gb),
                        discrete_gpu: worker.and_then(|w| w.discrete_gpu.clone()),
                        vram: worker.and_then(|w| w.vram.clone()),
                        device_os: worker.and_then(|w| w.os.clone()),
                        device_os_version: worker.and_then(|w| w.os_version.clone()),
                        compute_units: m.compute_units.clone(),
                        load_ms_median: m.load_ms_median,
                        load_ms_std_dev: m.load_ms_std_dev,
                        load_ms_average: m.load_ms_average,
                        load_ms_first: m.load_ms_first,
                        peak_load_ram_usage: m.peak_load_ram_usage,
                        inference_ms_median: m.inference_ms_median,
                        inference_ms_std_dev: m.inference_ms_std_dev,
                        inference_ms_average: m.inference_ms_average,
                        inference_ms_first: m.inference_ms_first,
                        peak_inference_ram_usage: m.peak_inference_ram_usage,
                        job_id: job_id.clone(),
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
