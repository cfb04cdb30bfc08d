// Greeting metrics module
//
// Lightweight counters for what the greeter decided and why

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Greeting outcome counters
///
/// Uses atomic operations so the event path and the self-greet tasks can
/// record without locks. Logged on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Welcome messages handed to the sink
    pub greets_sent: AtomicU64,

    /// Joins skipped because a cooldown clock was running
    pub cooldown_denials: AtomicU64,

    /// Joins skipped because the player is ignored
    pub ignored_skips: AtomicU64,

    /// Joins skipped because greeting was off, the name was empty or it was us
    pub inactive_skips: AtomicU64,

    /// Greets abandoned because no templates were available
    pub empty_pool_skips: AtomicU64,

    /// Sink rejected a message
    pub delivery_failures: AtomicU64,

    /// Self-greets handed to the sink
    pub self_greets_sent: AtomicU64,

    /// Self-greet fires that did nothing (disabled, cooldown, no player)
    pub self_greet_skips: AtomicU64,

    /// Per-player clock entries dropped by pruning
    pub clock_entries_pruned: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            greets_sent: AtomicU64::new(0),
            cooldown_denials: AtomicU64::new(0),
            ignored_skips: AtomicU64::new(0),
            inactive_skips: AtomicU64::new(0),
            empty_pool_skips: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            self_greets_sent: AtomicU64::new(0),
            self_greet_skips: AtomicU64::new(0),
            clock_entries_pruned: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_greet_sent(&self) {
        self.greets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cooldown_denial(&self) {
        self.cooldown_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.ignored_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inactive(&self) {
        self.inactive_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_pool(&self) {
        self.empty_pool_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_self_greet_sent(&self) {
        self.self_greets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_self_greet_skip(&self) {
        self.self_greet_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pruned(&self, count: usize) {
        self.clock_entries_pruned
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of evaluated joins that produced a greet, 0.0 when nothing was evaluated
    pub fn greet_rate(&self) -> f64 {
        let sent = self.greets_sent.load(Ordering::Relaxed);
        let denied = self.cooldown_denials.load(Ordering::Relaxed);
        let total = sent + denied;
        if total > 0 {
            sent as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Welcomer Summary ===");
        tracing::info!(
            "Uptime: {:.0}s, greet rate {:.1}%",
            self.uptime().as_secs_f64(),
            self.greet_rate() * 100.0
        );
        tracing::info!(
            "Greets: {} sent, {} cooldown denials, {} ignored, {} inactive, {} empty pool",
            self.greets_sent.load(Ordering::Relaxed),
            self.cooldown_denials.load(Ordering::Relaxed),
            self.ignored_skips.load(Ordering::Relaxed),
            self.inactive_skips.load(Ordering::Relaxed),
            self.empty_pool_skips.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Self-greets: {} sent, {} skipped; delivery failures: {}; pruned clock entries: {}",
            self.self_greets_sent.load(Ordering::Relaxed),
            self.self_greet_skips.load(Ordering::Relaxed),
            self.delivery_failures.load(Ordering::Relaxed),
            self.clock_entries_pruned.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
