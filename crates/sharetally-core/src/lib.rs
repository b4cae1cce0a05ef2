//! Core types for sharetally.
//!
//! This crate provides the data structures shared by the scanner-output
//! parser, the aggregation engine and the report layer: the UNC scan root,
//! record types, unit conversion and run configuration.

mod config;
mod error;
mod record;
mod root;
pub mod units;

pub use config::{LineFormat, MAX_PARALLEL, RollupConfig, RollupConfigBuilder, default_scanner_args};
pub use error::{Rejection, RollupError};
pub use record::{EntryKind, ParsedRecord, RawLine};
pub use root::{SEPARATOR, ScanRoot};
pub use units::{age_to_seconds, bytes_to_size, seconds_to_age, size_to_bytes};
