//! Scanner output records.

use serde::{Deserialize, Serialize};

/// Kind of filesystem entry reported by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Map the scanner's one-letter type code (`d` or `f`, any case).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "f" | "F" => Some(Self::File),
            "d" | "D" => Some(Self::Directory),
            _ => None,
        }
    }

    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }
}

/// One line of scanner output as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    /// Regular output (stdout).
    Output(String),
    /// Out-of-band error signal (stderr).
    Error(String),
}

impl RawLine {
    /// The line text regardless of channel.
    pub fn text(&self) -> &str {
        match self {
            Self::Output(text) | Self::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A successfully extracted record.
///
/// Borrows owner and path from the raw line; sizes and ages are already in
/// canonical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRecord<'a> {
    pub kind: EntryKind,
    pub owner: &'a str,
    pub size_bytes: u64,
    pub age_seconds: u64,
    pub path: &'a str,
    /// Size or age token needed the zero fallback.
    pub unit_fallback: bool,
}
