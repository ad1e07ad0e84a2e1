//! Report files on disk.
//!
//! Reports are pretty-printed JSON. Reading a report normalizes it to the
//! shape the aggregator produces: every supported chain has a heatmap row,
//! and a chain whose explorer failed carries no activity.

use crate::parser::schema::ActivityReport;
use crate::parser::ChainId;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Write a report to a JSON file, creating parent directories
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::InvalidPath` - path is empty, a directory, or its parent cannot be created
/// * `OutputError::SerializationFailed` - report could not be encoded
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_report(
    report: &ActivityReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    if output_path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }
    if output_path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "{} is a directory",
            output_path.display()
        )));
    }

    let parent = output_path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(|e| {
            OutputError::InvalidPath(format!("Cannot create {}: {}", parent.display(), e))
        })?;
    }

    let json = report_to_string(report)?;
    fs::write(output_path, &json)?;

    info!(
        "Report for {} written to {} ({} bytes, {} transactions)",
        report.address,
        output_path.display(),
        json.len(),
        report.report_card.total_txs()
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string (for stdout)
pub fn report_to_string(report: &ActivityReport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// Chains missing from the heatmap are filled in with no active days.
///
/// # Errors
/// * `OutputError::ReadFailed` - file could not be read
/// * `OutputError::SerializationFailed` - not a report, or an unknown chain key
/// * `OutputError::InconsistentReport` - a failed chain still carries activity
pub fn read_report(input_path: impl AsRef<Path>) -> Result<ActivityReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let json = fs::read_to_string(input_path).map_err(|source| OutputError::ReadFailed {
        path: input_path.display().to_string(),
        source,
    })?;

    let mut report: ActivityReport = serde_json::from_str(&json)?;

    for chain in ChainId::ALL {
        report.heatmap.entry(chain).or_insert_with(|| {
            debug!("{}: no heatmap row, treating as inactive", chain);
            Vec::new()
        });
    }

    for chain in &report.failed_chains {
        let chain_report = report.report_card.get(*chain);
        if chain_report.total_txs > 0 || report.active_days(*chain) > 0 {
            return Err(OutputError::InconsistentReport(format!(
                "{} is listed as failed but has {} transactions over {} days",
                chain,
                chain_report.total_txs,
                report.active_days(*chain)
            )));
        }
    }

    debug!(
        "Report loaded: version {}, address {}",
        report.version, report.address
    );

    Ok(report)
}
