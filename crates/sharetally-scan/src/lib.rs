//! Streaming scanner-output ingestion for sharetally.
//!
//! This crate turns the line-oriented output of an XCP-style share scanner
//! into per-folder statistics without ever holding more than one line in
//! memory.
//!
//! # Overview
//!
//! - **Classification** of raw lines into records, with blank, banner and
//!   foreign lines rejected and counted
//! - **Key resolution** of each record path to the first-level folder it
//!   belongs to
//! - **Aggregation** of size, newest age and owner per folder
//! - **Driving** the whole pipeline from a live scanner process or a saved
//!   transcript, with progress updates via broadcast channels
//!
//! # Example
//!
//! ```rust,no_run
//! use sharetally_scan::{IngestDriver, RollupConfig, ScannerCommand};
//!
//! let config = RollupConfig::builder()
//!     .root(r"\\fs01\projects\path")
//!     .build()
//!     .unwrap();
//! let mut driver = IngestDriver::new(&config).unwrap();
//! let exit_code = ScannerCommand::from_config(&config)
//!     .unwrap()
//!     .run(&mut driver)
//!     .unwrap();
//! let outcome = driver.finish(exit_code).unwrap();
//!
//! for folder in &outcome.folders {
//!     println!("{} {} bytes", folder.key, folder.total_bytes);
//! }
//! ```

mod classify;
mod collaborator;
mod driver;
mod key;
mod progress;
mod store;

pub use classify::Classifier;
pub use collaborator::{DEFAULT_SCANNER, ScannerCommand, locate_scanner, replay};
pub use driver::{IngestDriver, RollupOutcome};
pub use key::{FolderKey, KeyResolver};
pub use progress::{IngestStats, ScanProgress};
pub use store::{AggregationStore, FolderStats, FolderSummary};

// Re-export core types for convenience
pub use sharetally_core::{
    EntryKind, LineFormat, ParsedRecord, RawLine, Rejection, RollupConfig, RollupError, ScanRoot,
};
