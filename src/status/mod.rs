//! Status reporting boundary
//!
//! The crawl engine never talks to a display directly; it calls through the
//! [`StatusReporter`] trait. The default implementation logs through
//! `tracing`, and [`CountingReporter`] tallies every call for tests and
//! embedders that want programmatic totals.

mod thresholds;

pub use thresholds::check_record;

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// One kind of SEO threshold violation
///
/// Reported once per violated instance (per title, per heading, ...), not
/// once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// Title character length outside the configured range
    TitleCharLength,
    /// Title rendered pixel width outside the configured range
    TitlePixelWidth,
    /// Meta description character length outside the configured range
    DescriptionCharLength,
    /// Meta description pixel width outside the configured range
    DescriptionPixelWidth,
    /// Address string longer than the configured maximum
    UrlLength,
    /// H1 heading longer than the configured maximum
    HeadingOneLength,
    /// H2 heading longer than the configured maximum
    HeadingTwoLength,
    /// Image response larger than the configured maximum
    ImageSize,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 8] = [
        ProblemKind::TitleCharLength,
        ProblemKind::TitlePixelWidth,
        ProblemKind::DescriptionCharLength,
        ProblemKind::DescriptionPixelWidth,
        ProblemKind::UrlLength,
        ProblemKind::HeadingOneLength,
        ProblemKind::HeadingTwoLength,
        ProblemKind::ImageSize,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::TitleCharLength => "title length",
            Self::TitlePixelWidth => "title pixel width",
            Self::DescriptionCharLength => "description length",
            Self::DescriptionPixelWidth => "description pixel width",
            Self::UrlLength => "url length",
            Self::HeadingOneLength => "h1 length",
            Self::HeadingTwoLength => "h2 length",
            Self::ImageSize => "image size",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives crawl status updates
///
/// Implementations must tolerate concurrent calls from many fetch tasks.
pub trait StatusReporter: Send + Sync {
    /// Called after each admission slot acquisition or release
    fn concurrency_status(&self, active: usize);

    /// Called after each page finishes processing
    ///
    /// `estimated_total` is the frontier-size estimate, not an exact
    /// remaining-work count.
    fn progress(&self, visited: u64, estimated_total: u64);

    /// Called once per violated threshold instance
    fn problem(&self, kind: ProblemKind);

    /// Called exactly once, after the finalization pass
    fn crawl_finished(&self);
}

/// Default reporter that logs through `tracing`
#[derive(Debug, Default)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn concurrency_status(&self, active: usize) {
        tracing::trace!(active, "fetch slots in use");
    }

    fn progress(&self, visited: u64, estimated_total: u64) {
        tracing::debug!(visited, estimated_total, "crawl progress");
    }

    fn problem(&self, kind: ProblemKind) {
        tracing::info!(problem = kind.label(), "threshold violated");
    }

    fn crawl_finished(&self) {
        tracing::info!("crawl finished");
    }
}

/// Reporter that tallies every call
///
/// Used by the integration tests to assert on concurrency ceilings and
/// problem counts; also handy for embedders that render their own status.
#[derive(Debug, Default)]
pub struct CountingReporter {
    max_active: AtomicUsize,
    last_progress: Mutex<(u64, u64)>,
    problem_counts: Mutex<std::collections::HashMap<ProblemKind, u64>>,
    finished_calls: AtomicU64,
}

impl CountingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest concurrent-fetch count observed
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Last `(visited, estimated_total)` pair reported
    pub fn last_progress(&self) -> (u64, u64) {
        *self.last_progress.lock().unwrap()
    }

    /// Number of reports for one problem kind
    pub fn problems(&self, kind: ProblemKind) -> u64 {
        self.problem_counts
            .lock()
            .unwrap()
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Total problem reports across all kinds
    pub fn total_problems(&self) -> u64 {
        self.problem_counts.lock().unwrap().values().sum()
    }

    /// How many times `crawl_finished` was called
    pub fn finished_calls(&self) -> u64 {
        self.finished_calls.load(Ordering::SeqCst)
    }
}

impl StatusReporter for CountingReporter {
    fn concurrency_status(&self, active: usize) {
        self.max_active.fetch_max(active, Ordering::SeqCst);
    }

    fn progress(&self, visited: u64, estimated_total: u64) {
        *self.last_progress.lock().unwrap() = (visited, estimated_total);
    }

    fn problem(&self, kind: ProblemKind) {
        *self.problem_counts.lock().unwrap().entry(kind).or_insert(0) += 1;
    }

    fn crawl_finished(&self) {
        self.finished_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_reporter_tracks_max_active() {
        let reporter = CountingReporter::new();
        reporter.concurrency_status(2);
        reporter.concurrency_status(5);
        reporter.concurrency_status(3);
        assert_eq!(reporter.max_active(), 5);
    }

    #[test]
    fn test_counting_reporter_problems() {
        let reporter = CountingReporter::new();
        reporter.problem(ProblemKind::TitleCharLength);
        reporter.problem(ProblemKind::TitleCharLength);
        reporter.problem(ProblemKind::ImageSize);

        assert_eq!(reporter.problems(ProblemKind::TitleCharLength), 2);
        assert_eq!(reporter.problems(ProblemKind::ImageSize), 1);
        assert_eq!(reporter.problems(ProblemKind::UrlLength), 0);
        assert_eq!(reporter.total_problems(), 3);
    }

    #[test]
    fn test_counting_reporter_progress_keeps_last() {
        let reporter = CountingReporter::new();
        reporter.progress(1, 4);
        reporter.progress(3, 9);
        assert_eq!(reporter.last_progress(), (3, 9));
    }
}
