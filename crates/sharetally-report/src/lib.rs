//! Report rendering for sharetally.
//!
//! Turns the sorted folder summaries of a finished run into display rows and
//! renders them as:
//!
//! - **Console tables** aligned for terminal output
//! - **CSV** with one row per folder (the default on-disk report)
//! - **JSON** including run counters and captured scanner errors
//!
//! Sizes and ages are rendered with the exact inverses of the parser's unit
//! conversions, so a report never disagrees with the aggregated numbers.
//!
//! ```rust,ignore
//! use sharetally_report::{build_rows, render_table};
//!
//! let rows = build_rows(&root, &outcome.folders);
//! print!("{}", render_table(&rows));
//! ```

mod export;
mod rows;
mod table;

pub use export::{JsonReport, ReportError, default_output_name, write_csv, write_csv_file};
pub use rows::{ReportRow, build_rows};
pub use table::render_table;
