//! The per-line ingest loop.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use sharetally_core::{RawLine, Rejection, RollupConfig, RollupError};

use crate::classify::Classifier;
use crate::key::KeyResolver;
use crate::progress::{IngestStats, ProgressTracker, ScanProgress};
use crate::store::{AggregationStore, FolderSummary};

/// Result of a run that produced a usable report.
#[derive(Debug, Clone, Serialize)]
pub struct RollupOutcome {
    /// Folder summaries sorted by key.
    pub folders: Vec<FolderSummary>,
    pub stats: IngestStats,
    /// Retained scanner error lines (capped).
    pub errors: Vec<String>,
    /// Scanner exit code; `None` if it was terminated by a signal.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl RollupOutcome {
    /// The scanner reported a failure but some folders were still aggregated.
    pub fn is_partial(&self) -> bool {
        self.exit_code != Some(0)
    }

    /// Sum of all folder sizes.
    pub fn total_bytes(&self) -> u64 {
        self.folders.iter().map(|f| f.total_bytes).sum()
    }
}

/// Drives classification, key resolution and aggregation for one run.
///
/// Lines must be fed in arrival order; the store has a single writer.
pub struct IngestDriver {
    classifier: Classifier,
    resolver: KeyResolver,
    store: AggregationStore,
    stats: IngestStats,
    errors: Vec<String>,
    max_error_lines: usize,
    tracker: ProgressTracker,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl IngestDriver {
    /// Create a driver for a configured run.
    pub fn new(config: &RollupConfig) -> Result<Self, RollupError> {
        let root = config.scan_root()?;
        let driver = Self::with_parts(
            Classifier::new(config.formats.clone()),
            KeyResolver::for_root(&root, config.level),
        )
        .with_progress_interval(config.progress_interval)
        .with_max_error_lines(config.max_error_lines);
        debug!(
            root = %root,
            formats = ?driver.classifier.formats(),
            target_depth = driver.resolver.target_depth(),
            "ingest driver ready"
        );
        Ok(driver)
    }

    /// Create a driver from explicit components with default limits.
    pub fn with_parts(classifier: Classifier, resolver: KeyResolver) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            classifier,
            resolver,
            store: AggregationStore::new(),
            stats: IngestStats::default(),
            errors: Vec::new(),
            max_error_lines: 1000,
            tracker: ProgressTracker::new(10_000),
            progress_tx,
        }
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.tracker = ProgressTracker::new(interval);
        self
    }

    pub fn with_max_error_lines(mut self, max: usize) -> Self {
        self.max_error_lines = max;
        self
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Process one line.
    pub fn ingest(&mut self, line: &RawLine) {
        self.stats.total_lines += 1;

        match self.classifier.classify(line) {
            Ok(record) => {
                if record.unit_fallback {
                    self.stats.unit_fallbacks += 1;
                    debug!(path = record.path, "size or age token fell back to zero");
                }
                match self.resolver.resolve(record.path) {
                    Some(folder) => {
                        self.store.absorb(
                            folder.key,
                            record.kind,
                            record.owner,
                            record.size_bytes,
                            record.age_seconds,
                            folder.exact,
                        );
                        self.stats.processed += 1;
                    }
                    None => self.stats.excluded += 1,
                }
            }
            Err(Rejection::ErrorSignal) => {
                self.stats.error_lines += 1;
                if self.errors.len() < self.max_error_lines {
                    self.errors.push(line.text().trim_end().to_string());
                }
            }
            Err(rejection) if rejection.is_silent() => self.stats.filtered += 1,
            Err(_) => self.stats.skipped += 1,
        }

        if self.tracker.is_due(self.stats.total_lines) {
            self.report_progress();
        }
    }

    /// Process every line of an iterator.
    pub fn ingest_all<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = RawLine>,
    {
        for line in lines {
            self.ingest(&line);
        }
    }

    fn report_progress(&self) {
        let progress = self.tracker.snapshot(&self.stats, self.store.len());
        info!(
            lines = progress.lines_read,
            processed = progress.records_processed,
            folders = progress.folders,
            errors = progress.errors_count,
            lines_per_sec = progress.lines_per_second() as u64,
            "ingest progress"
        );
        let _ = self.progress_tx.send(progress);
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn store(&self) -> &AggregationStore {
        &self.store
    }

    /// Retained scanner error lines.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// End the run once the scanner has exited.
    ///
    /// A non-zero exit is only fatal when nothing was aggregated.
    pub fn finish(self, exit_code: Option<i32>) -> Result<RollupOutcome, RollupError> {
        let failed = exit_code != Some(0);
        if failed && self.store.is_empty() {
            return Err(RollupError::ScannerFailed {
                exit_code,
                errors: self.errors,
            });
        }
        if failed {
            warn!(
                ?exit_code,
                folders = self.store.len(),
                error_lines = self.stats.error_lines,
                "scanner exited with an error; reporting partial results"
            );
        }

        info!(
            lines = self.stats.total_lines,
            processed = self.stats.processed,
            skipped = self.stats.skipped,
            folders = self.store.len(),
            "ingest complete"
        );

        Ok(RollupOutcome {
            elapsed: self.tracker.elapsed(),
            folders: self.store.into_snapshot(),
            stats: self.stats,
            errors: self.errors,
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> IngestDriver {
        IngestDriver::with_parts(Classifier::default(), KeyResolver::new(1))
    }

    fn out(text: &str) -> RawLine {
        RawLine::Output(text.to_string())
    }

    #[test]
    fn test_counters() {
        let mut driver = driver();
        driver.ingest_all([
            out("XCP 1.9.3"),
            out(""),
            out(r"d S-1 4KiB 1d path"),
            out(r"f S-1 1KiB 1d path\a\x.txt"),
            out("not a record"),
            RawLine::Error("error reading path\\b: access denied".into()),
        ]);

        let stats = driver.stats();
        assert_eq!(stats.total_lines, 6);
        assert_eq!(stats.filtered, 2);
        assert_eq!(stats.excluded, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.error_lines, 1);
        assert_eq!(driver.errors().len(), 1);
    }

    #[test]
    fn test_unknown_unit_is_counted_and_absorbed() {
        let mut driver = driver();
        driver.ingest_all([
            out(r"f S-1 2KiB 3w path\a\old.txt"),
            out(r"f S-1 1KiB 1d path\a\new.txt"),
        ]);

        let stats = driver.stats();
        assert_eq!(stats.unit_fallbacks, 1);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.skipped, 0);

        let folder = driver.store().get(r"path\a").unwrap();
        assert_eq!(folder.total_bytes, 3 * 1024);
        assert_eq!(folder.newest_age_seconds, 0);
        assert_eq!(folder.file_count, 2);
    }

    #[test]
    fn test_error_lines_are_capped() {
        let mut driver = driver().with_max_error_lines(2);
        for i in 0..5 {
            driver.ingest(&RawLine::Error(format!("error {i}")));
        }
        assert_eq!(driver.stats().error_lines, 5);
        assert_eq!(driver.errors(), ["error 0", "error 1"]);
    }

    #[test]
    fn test_progress_every_interval() {
        let mut driver = driver().with_progress_interval(10_000);
        let mut rx = driver.subscribe();

        for _ in 0..25_000 {
            driver.ingest(&out(r"f S-1 1 1s path\a\f"));
        }

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.lines_read, 10_000);
        assert_eq!(second.lines_read, 20_000);
        assert_eq!(second.folders, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failure_with_empty_store() {
        let mut driver = driver();
        driver.ingest(&RawLine::Error("cannot connect".into()));

        match driver.finish(Some(1)) {
            Err(RollupError::ScannerFailed { exit_code, errors }) => {
                assert_eq!(exit_code, Some(1));
                assert_eq!(errors, vec!["cannot connect".to_string()]);
            }
            other => panic!("expected scanner failure, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_results_are_kept() {
        let mut driver = driver();
        driver.ingest(&out(r"f S-1 10 1s path\a\f"));

        let outcome = driver.finish(Some(3)).unwrap();
        assert!(outcome.is_partial());
        assert_eq!(outcome.folders.len(), 1);
        assert_eq!(outcome.total_bytes(), 10);
    }

    #[test]
    fn test_clean_exit_with_no_records() {
        let outcome = driver().finish(Some(0)).unwrap();
        assert!(outcome.folders.is_empty());
        assert!(!outcome.is_partial());
    }
}
