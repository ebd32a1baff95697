// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CSV report generation for completed campaigns.

use bf_store::ResultRow;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write the per-campaign report to
/// `{output_dir}/{campaign_id}_{YYYYMMDD_HHMMSS}_results.csv`.
///
/// The header comes from [`ResultRow`]'s field order; missing values
/// serialize as empty cells. Row order is whatever the store join produced.
pub fn write_campaign_csv(
    output_dir: &Path,
    campaign_id: &str,
    rows: &[ResultRow],
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("{campaign_id}_{timestamp}_results.csv"));

    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(campaign_id, path = %path.display(), rows = rows.len(), "campaign CSV written");
    Ok(path)
}

/// List the generated report files in `output_dir`, newest name last.
pub fn list_reports(output_dir: &Path) -> Result<Vec<String>, ReportError> {
    let mut names = Vec::new();
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
