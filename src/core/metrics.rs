//! Logger metrics for observability
//!
//! Counters for emitted, dropped and filtered records, plus config watcher
//! activity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_mdc_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records written to the sink
    total_logged: AtomicU64,

    /// Records lost to encode or write failures
    dropped_count: AtomicU64,

    /// Records discarded by the level threshold
    filtered_count: AtomicU64,

    /// Config watchers started (never exceeds 1 per logger)
    watcher_starts: AtomicU64,

    /// Level directives applied from the config file
    config_reloads: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            watcher_starts: AtomicU64::new(0),
            config_reloads: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn watcher_starts(&self) -> u64 {
        self.watcher_starts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn config_reloads(&self) -> u64 {
        self.config_reloads.load(Ordering::Relaxed)
    }

    /// Record a successfully written entry, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_watcher_start(&self) -> u64 {
        self.watcher_starts.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_config_reload(&self) -> u64 {
        self.config_reloads.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Filtered records are not counted. Returns 0.0 if nothing was emitted.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset the record counters to zero.
    ///
    /// Watcher counters are left alone; they describe logger state rather
    /// than traffic.
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            watcher_starts: AtomicU64::new(self.watcher_starts()),
            config_reloads: AtomicU64::new(self.config_reloads()),
        }
    }
}
