//! Result export utilities.
//!
//! One CSV row or one JSON object per replication, in replication order.

use std::path::Path;

use crate::metrics::ReplicationResult;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export replication results to CSV.
///
/// Creates a CSV file with the policy label, the seed and the headline
/// metrics of every replication, followed by the per-facility average waits.
///
/// # Errors
///
/// Returns an error if there are no results or if file creation or CSV writing fails.
pub fn export_to_csv(
    results: &[ReplicationResult],
    label: &str,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_to_csv_impl(results, label, file)
}

/// Export replication results to JSON format.
///
/// Creates a JSON file with an array of all results, full summaries included.
///
/// # Errors
///
/// Returns an error if file creation or JSON serialization fails.
pub fn export_to_json(
    results: &[ReplicationResult],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(results, file)
}
