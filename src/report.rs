//! Run report generation.
//!
//! Every run is summarized to the log; the JSON form is written only when a
//! report path is configured.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::allocator::{ExhaustionPolicy, Outcome, SkippedRequest};
use crate::pool::PoolStats;
use crate::utils::InventoryReport;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub requests_file: String,
    pub resources_file: String,
    pub output_file: String,
    pub policy: ExhaustionPolicy,
    pub total_requests: usize,
    pub routed_requests: usize,
    pub result_rows: usize,
    pub skipped: Vec<SkippedRequest>,
    pub inventory: InventoryReport,
    pub pool: PoolStats,
}

impl RunReport {
    pub fn new(
        requests_file: &Path,
        resources_file: &Path,
        output_file: &Path,
        policy: ExhaustionPolicy,
        total_requests: usize,
        outcome: Outcome,
        inventory: InventoryReport,
        pool: PoolStats,
    ) -> Self {
        RunReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            requests_file: requests_file.display().to_string(),
            resources_file: resources_file.display().to_string(),
            output_file: output_file.display().to_string(),
            policy,
            total_requests,
            routed_requests: outcome.routed,
            result_rows: outcome.rows,
            skipped: outcome.skipped,
            inventory,
            pool,
        }
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &RunReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize run report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Log a short summary of the run
pub fn print_summary(report: &RunReport) {
    log::info!(
        "Routed {}/{} requests into {} rows (policy: {})",
        report.routed_requests, report.total_requests, report.result_rows, report.policy
    );
    log::info!(
        "Pool: {} of {} resources reserved, {} primaries and {} pairs still free",
        report.pool.reserved, report.pool.total, report.pool.free_primary, report.pool.free_pairs
    );
    if !report.skipped.is_empty() {
        let ids: Vec<String> = report.skipped.iter().map(|s| s.request_id.to_string()).collect();
        log::warn!("{} request(s) skipped: {}", report.skipped.len(), ids.join(", "));
    }
}
