// File: crates/stash/src/memory/stats.rs
use std::time::Instant;

/// Usage statistics for one free list.
///
/// Tracks how often checkouts were served from the list versus freshly
/// allocated, and how many returned objects had to be dropped, to help size
/// the list.
#[derive(Debug, Clone)]
pub struct PoolStats {
    /// Checkouts served from the list
    pub hits: u64,
    /// Checkouts that found the list empty
    pub misses: u64,
    /// Objects accepted back into the list
    pub checkins: u64,
    /// Objects dropped because the list was already full
    pub discards: u64,
    /// Objects currently handed out and not yet returned
    pub outstanding: u64,
    /// Highest value `outstanding` has reached
    pub peak_outstanding: u64,
    /// Creation time of the list
    pub creation_time: Instant,
}

impl PoolStats {
    /// Create a new statistics tracker.
    pub fn new() -> Self {
        Self {
            hits: 0,
            misses: 0,
            checkins: 0,
            discards: 0,
            outstanding: 0,
            peak_outstanding: 0,
            creation_time: Instant::now(),
        }
    }

    /// Record a checkout served from the list.
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.record_checkout();
    }

    /// Record a checkout that had to allocate.
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.record_checkout();
    }

    /// Record an object accepted back into the list.
    pub fn record_checkin(&mut self) {
        self.checkins += 1;
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    /// Record an object dropped on return because the list was full.
    pub fn record_discard(&mut self) {
        self.discards += 1;
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    fn record_checkout(&mut self) {
        self.outstanding += 1;
        self.peak_outstanding = self.peak_outstanding.max(self.outstanding);
    }

    /// Total checkouts, hits and misses together.
    pub fn checkouts(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of checkouts served without allocating (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.checkouts();
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get the checkout rate (checkouts per second).
    pub fn checkout_rate(&self) -> f64 {
        let elapsed = self.creation_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.checkouts() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Format the counters as a human-readable string.
    pub fn format_summary(&self) -> String {
        format!(
            "Free List Usage:\n\
             - Checkouts: {} ({} hits, {} misses)\n\
             - Hit rate: {:.1}%\n\
             - Returned: {} kept, {} discarded\n\
             - Outstanding: {} (peak {})",
            self.checkouts(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.checkins,
            self.discards,
            self.outstanding,
            self.peak_outstanding
        )
    }

    /// Reset all statistics (useful for benchmarking).
    pub fn reset_stats(&mut self) {
        *self = Self::new();
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}
