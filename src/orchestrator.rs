//! Run orchestrator.
//!
//! This module coordinates a full routing run: loading the inventory and the
//! request batch, routing every request against the pool, and writing the
//! result file and run report.

use crate::allocator::route_all;
use crate::config::Config;
use crate::loader::{load_requests, load_resources};
use crate::report::{generate_json_report, print_summary, RunReport};
use crate::utils::validation::validate_inventory;
use crate::writer::write_results;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;

/// Execute one routing run described by `config`.
///
/// Results are routed completely in memory before the result file is
/// touched, so a run aborted by an unsatisfiable request leaves no partial
/// output behind.
pub fn run(config: &Config) -> Result<RunReport> {
    let mut pool = load_resources(&config.input.vlans)?;
    let inventory = validate_inventory(pool.iter());

    let requests = load_requests(&config.input.requests)?;
    let total_requests = requests.len();

    let policy = config.allocation.on_exhausted;
    let (results, outcome) = route_all(requests, &mut pool, policy)
        .wrap_err("Routing aborted; no result file was written")?;

    write_results(&config.output.results, &results)?;

    let report = RunReport::new(
        &config.input.requests,
        &config.input.vlans,
        &config.output.results,
        policy,
        total_requests,
        outcome,
        inventory,
        pool.stats(),
    );

    if let Some(report_path) = &config.output.report {
        generate_json_report(&report, report_path)?;
    }
    print_summary(&report);

    Ok(report)
}
