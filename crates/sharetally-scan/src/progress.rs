//! Ingest progress reporting.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Progress information during an ingest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Lines read from the scanner so far.
    pub lines_read: u64,
    /// Records absorbed into the store so far.
    pub records_processed: u64,
    /// Distinct folders seen so far.
    pub folders: u64,
    /// Scanner error lines seen so far.
    pub errors_count: u64,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate read rate in lines per second.
    pub fn lines_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.lines_read as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Every line received, on either channel.
    pub total_lines: u64,
    /// Records absorbed into the store.
    pub processed: u64,
    /// Records whose path lies at or above the scan root.
    pub excluded: u64,
    /// Blank, banner and summary lines.
    pub filtered: u64,
    /// Lines matching no record layout.
    pub skipped: u64,
    /// Lines on the scanner's error channel.
    pub error_lines: u64,
    /// Records whose size or age token fell back to zero.
    pub unit_fallbacks: u64,
}

/// Timing wrapper around [`IngestStats`] for progress snapshots.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    interval: u64,
}

impl ProgressTracker {
    pub fn new(interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            interval: interval.max(1),
        }
    }

    /// Whether `lines` sits on a reporting boundary.
    pub fn is_due(&self, lines: u64) -> bool {
        lines % self.interval == 0
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self, stats: &IngestStats, folders: usize) -> ScanProgress {
        ScanProgress {
            lines_read: stats.total_lines,
            records_processed: stats.processed,
            folders: folders as u64,
            errors_count: stats.error_lines,
            elapsed: self.elapsed(),
        }
    }
}
