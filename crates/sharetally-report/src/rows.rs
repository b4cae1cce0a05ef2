//! Display rows built from folder summaries.

use serde::{Deserialize, Serialize};

use sharetally_core::{ScanRoot, bytes_to_size, seconds_to_age};
use sharetally_scan::FolderSummary;

/// One report line, ready for any output format.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub owner: String,
    pub path: String,
    pub size: String,
    pub size_bytes: u64,
    pub newest_age: String,
    pub newest_age_seconds: u64,
}

impl ReportRow {
    /// Build a row, expanding the folder key to a full UNC path.
    pub fn from_summary(root: &ScanRoot, summary: &FolderSummary) -> Self {
        Self {
            owner: summary.owner.to_string(),
            path: root.join(&summary.key),
            size: bytes_to_size(summary.total_bytes),
            size_bytes: summary.total_bytes,
            newest_age: seconds_to_age(summary.newest_age_seconds),
            newest_age_seconds: summary.newest_age_seconds,
        }
    }
}

/// Rows for every summary, keeping the summaries' key order.
pub fn build_rows(root: &ScanRoot, summaries: &[FolderSummary]) -> Vec<ReportRow> {
    summaries
        .iter()
        .map(|summary| ReportRow::from_summary(root, summary))
        .collect()
}
