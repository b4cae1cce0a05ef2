//! CSV and JSON serialization of report rows.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use sharetally_core::ScanRoot;
use sharetally_scan::{IngestStats, RollupOutcome};

use crate::rows::ReportRow;

/// Errors while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write rows to a CSV file, creating or truncating it.
pub fn write_csv_file(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, rows)?;
    info!(path = %path.display(), rows = rows.len(), "wrote CSV report");
    Ok(())
}

/// Default report file name: `sharetally_<server>_<share>_<timestamp>.csv`.
pub fn default_output_name(root: &ScanRoot, at: DateTime<Local>) -> String {
    format!(
        "sharetally_{}_{}_{}.csv",
        sanitize(root.server()),
        sanitize(root.share()),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Replace characters that are awkward in file names.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// JSON document for a finished run.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub root: String,
    pub exit_code: Option<i32>,
    pub partial: bool,
    pub stats: &'a IngestStats,
    pub errors: &'a [String],
    pub folders: &'a [ReportRow],
}

impl<'a> JsonReport<'a> {
    pub fn new(root: &ScanRoot, outcome: &'a RollupOutcome, rows: &'a [ReportRow]) -> Self {
        Self {
            root: root.to_string(),
            exit_code: outcome.exit_code,
            partial: outcome.is_partial(),
            stats: &outcome.stats,
            errors: &outcome.errors,
            folders: rows,
        }
    }

    pub fn to_string_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row() -> ReportRow {
        ReportRow {
            owner: r"CORP\jdoe".to_string(),
            path: r"\\fs01\projects\path\sub 1".to_string(),
            size: "1.00 KB".to_string(),
            size_bytes: 1024,
            newest_age: "2d".to_string(),
            newest_age_seconds: 172_800,
        }
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[row()]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Owner,Path,Size,SizeBytes,NewestAge,NewestAgeSeconds")
        );
        assert_eq!(
            lines.next(),
            Some(r"CORP\jdoe,\\fs01\projects\path\sub 1,1.00 KB,1024,2d,172800")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_default_output_name() {
        let root = ScanRoot::parse(r"\\fs01.corp\team share\path").unwrap();
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            default_output_name(&root, at),
            "sharetally_fs01_corp_team_share_20240309_140507.csv"
        );
    }
}
