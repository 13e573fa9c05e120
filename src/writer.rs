//! Result file writing.

use crate::model::AllocationResult;
use color_eyre::eyre::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of every result file
pub const RESULT_HEADER: [&str; 4] = ["request_id", "device_id", "primary_port", "vlan_id"];

/// Write the header and one line per row, `\n`-terminated
pub fn write_results_to<W: Write>(writer: W, results: &[AllocationResult]) -> std::result::Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(RESULT_HEADER)?;
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the result file, replacing any previous one
pub fn write_results(path: &Path, results: &[AllocationResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create result file {}", path.display()))?;

    write_results_to(file, results)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;

    log::info!("Wrote {} result rows to {}", results.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortRole, SlotKey};

    #[test]
    fn test_rows_follow_header() {
        let key = SlotKey { vlan_id: 10, device_id: 1 };
        let results = vec![
            AllocationResult::new(1, key, PortRole::Secondary),
            AllocationResult::new(1, key, PortRole::Primary),
        ];

        let mut buffer = Vec::new();
        write_results_to(&mut buffer, &results).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "request_id,device_id,primary_port,vlan_id\n1,1,0,10\n1,1,1,10\n"
        );
    }

    #[test]
    fn test_empty_results_still_have_header() {
        let mut buffer = Vec::new();
        write_results_to(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "request_id,device_id,primary_port,vlan_id\n");
    }
}
