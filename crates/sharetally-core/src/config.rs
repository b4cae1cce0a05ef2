//! Roll-up run configuration.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::RollupError;
use crate::root::ScanRoot;

/// Highest concurrency hint the scanner accepts.
pub const MAX_PARALLEL: u8 = 61;

/// Record layouts the classifier understands, tried in the listed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LineFormat {
    /// `<d|f> <owner> <size> <age> <path...>` matched as a single pattern.
    Dense,
    /// Whitespace-split columns with the path rejoined from the remainder.
    Legacy,
}

/// Configuration for a roll-up run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RollupConfig {
    /// UNC path to scan (`\\server\share[\sub\path]`).
    pub root: String,

    /// Concurrency hint passed to the scanner (1-61).
    #[builder(default = "8")]
    #[serde(default = "default_parallel")]
    pub parallel: u8,

    /// How many levels below the scan root to roll up at (1 = children).
    #[builder(default = "1")]
    #[serde(default = "default_level")]
    pub level: usize,

    /// Explicit scanner executable; looked up on `PATH` when unset.
    #[builder(default)]
    #[serde(default)]
    pub scanner: Option<PathBuf>,

    /// Scanner arguments. `{parallel}` and `{root}` are substituted.
    #[builder(default = "default_scanner_args()")]
    #[serde(default = "default_scanner_args")]
    pub scanner_args: Vec<String>,

    /// Enabled record layouts in priority order.
    #[builder(default = "default_formats()")]
    #[serde(default = "default_formats")]
    pub formats: Vec<LineFormat>,

    /// Emit a progress update every this many lines.
    #[builder(default = "10_000")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,

    /// Maximum number of scanner error lines kept for diagnostics.
    #[builder(default = "1000")]
    #[serde(default = "default_max_error_lines")]
    pub max_error_lines: usize,
}

fn default_parallel() -> u8 {
    8
}

fn default_level() -> usize {
    1
}

fn default_progress_interval() -> u64 {
    10_000
}

fn default_max_error_lines() -> usize {
    1000
}

/// Default scanner invocation.
pub fn default_scanner_args() -> Vec<String> {
    ["scan", "-l", "-ownership", "-parallel", "{parallel}", "{root}"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_formats() -> Vec<LineFormat> {
    vec![LineFormat::Dense, LineFormat::Legacy]
}

impl RollupConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) => {
                ScanRoot::parse(root).map_err(|e| e.to_string())?;
            }
            None => return Err("Scan root is required".to_string()),
        }
        if let Some(parallel) = self.parallel {
            if !(1..=MAX_PARALLEL).contains(&parallel) {
                return Err(format!("Parallel must be between 1 and {MAX_PARALLEL}, got {parallel}"));
            }
        }
        if self.level == Some(0) {
            return Err("Level must be at least 1".to_string());
        }
        if self.progress_interval == Some(0) {
            return Err("Progress interval must be positive".to_string());
        }
        if self.formats.as_ref().is_some_and(Vec::is_empty) {
            return Err("At least one line format must be enabled".to_string());
        }
        Ok(())
    }
}

impl RollupConfig {
    /// Create a new config builder.
    pub fn builder() -> RollupConfigBuilder {
        RollupConfigBuilder::default()
    }

    /// Create a config with defaults for the given root.
    ///
    /// The root is not validated; [`scan_root`](Self::scan_root) does that.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            parallel: default_parallel(),
            level: default_level(),
            scanner: None,
            scanner_args: default_scanner_args(),
            formats: default_formats(),
            progress_interval: default_progress_interval(),
            max_error_lines: default_max_error_lines(),
        }
    }

    /// Parse the configured root.
    pub fn scan_root(&self) -> Result<ScanRoot, RollupError> {
        ScanRoot::parse(&self.root)
    }

    /// Scanner arguments with placeholders filled in.
    ///
    /// `{root}` expands to the normalized root, the same one reports are
    /// built from.
    pub fn expanded_scanner_args(&self) -> Result<Vec<String>, RollupError> {
        let root = self.scan_root()?.to_string();
        let parallel = self.parallel.to_string();
        Ok(self
            .scanner_args
            .iter()
            .map(|arg| arg.replace("{parallel}", &parallel).replace("{root}", &root))
            .collect())
    }
}
