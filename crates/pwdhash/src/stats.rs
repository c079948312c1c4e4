use core::time::Duration;
use portable_atomic::{AtomicU64, Ordering};

/// Aggregate counters shared between the request path and the workers.
///
/// Every counter only ever grows and is updated with a single atomic
/// increment, so concurrent submissions are never lost or double counted. A
/// snapshot taken while a submission is in flight may or may not include it.
#[derive(Debug, Default)]
pub struct Stats {
    submissions: AtomicU64,
    completed: AtomicU64,
    processing_micros: AtomicU64,
}

impl Stats {
    pub const fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            processing_micros: AtomicU64::new(0),
        }
    }

    /// Counts one accepted submission.
    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one completed job that took `elapsed`.
    pub fn record_completion(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.processing_micros.fetch_add(micros, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total accepted submissions.
    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    /// Total completed jobs.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Cumulative processing time of all completed jobs, in microseconds.
    pub fn processing_micros(&self) -> u64 {
        self.processing_micros.load(Ordering::Relaxed)
    }

    /// Reads the counters into a [`StatsSnapshot`].
    ///
    /// The average is the cumulative processing time divided by the number of
    /// completed jobs, or `0` when nothing has completed yet.
    pub fn snapshot(&self) -> StatsSnapshot {
        let completed = self.completed();
        let micros = self.processing_micros();
        StatsSnapshot {
            total: self.submissions(),
            average: micros.checked_div(completed).unwrap_or(0),
        }
    }
}

/// Point-in-time view of [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Number of accepted submissions.
    pub total: u64,
    /// Mean processing time per completed job, in microseconds.
    pub average: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_stats_report_zero_average() {
        let stats = Stats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot { total: 0, average: 0 });
    }

    #[test]
    fn submissions_without_completions_keep_zero_average() {
        let stats = Stats::new();
        stats.record_submission();
        stats.record_submission();
        assert_eq!(stats.snapshot(), StatsSnapshot { total: 2, average: 0 });
    }

    #[test]
    fn average_is_cumulative_over_completed() {
        let stats = Stats::new();
        for _ in 0..3 {
            stats.record_submission();
        }
        stats.record_completion(Duration::from_micros(100));
        stats.record_completion(Duration::from_micros(300));

        assert_eq!(stats.completed(), 2);
        assert_eq!(stats.processing_micros(), 400);
        assert_eq!(stats.snapshot(), StatsSnapshot { total: 3, average: 200 });
    }

    #[test]
    fn concurrent_updates_are_exact() {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 10_000;

        let stats = Arc::new(Stats::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        stats.record_submission();
                        stats.record_completion(Duration::from_micros(2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let total = THREADS * PER_THREAD;
        assert_eq!(stats.submissions(), total);
        assert_eq!(stats.completed(), total);
        assert_eq!(stats.processing_micros(), total * 2);
        assert_eq!(stats.snapshot().average, 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_serializes_as_total_and_average() {
        let json = serde_json::to_string(&StatsSnapshot { total: 5, average: 42 }).unwrap();
        assert_eq!(json, r#"{"total":5,"average":42}"#);
    }
}
