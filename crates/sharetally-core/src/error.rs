//! Error types for roll-up runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a roll-up run.
#[derive(Debug, Error)]
pub enum RollupError {
    /// The scan root is not a usable UNC path.
    #[error("Invalid scan root {path:?}: {reason}")]
    InvalidRoot { path: String, reason: String },

    /// The scanning tool could not be located.
    #[error("Scanner not found: {program}")]
    ScannerNotFound { program: String },

    /// The scanning tool could not be started.
    #[error("Failed to start scanner {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scanner exited non-zero without producing a single usable record.
    #[error(
        "Scanner failed with exit code {}; {} error line(s) captured",
        display_code(.exit_code),
        .errors.len()
    )]
    ScannerFailed {
        exit_code: Option<i32>,
        errors: Vec<String>,
    },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

impl RollupError {
    /// Create an invalid-root error.
    pub fn invalid_root(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a raw line did not become a record.
///
/// Rejections never abort a run; they only show up in the ingest counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Empty or whitespace-only line.
    Blank,
    /// Line arrived on the scanner's error channel.
    ErrorSignal,
    /// Banner, column header, separator or summary line.
    Header,
    /// Line matched none of the enabled record layouts.
    Unrecognized,
}

impl Rejection {
    /// Whether this rejection is expected noise rather than a malformed record.
    pub fn is_silent(self) -> bool {
        matches!(self, Self::Blank | Self::Header)
    }
}
