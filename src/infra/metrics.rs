//! Lock-free metrics collection and periodic reporting
//!
//! Uses atomics for hot-path operations to avoid mutex contention.
//! All counter updates are lock-free; reporting swaps the interval
//! window counters atomically.
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Session-wide counters, shared behind an `Arc`
pub struct Metrics {
    started: Instant,
    /// Simulation ticks since the last report (window counter)
    ticks_window: AtomicU64,
    ticks_total: AtomicU64,
    detections: AtomicU64,
    alerts_emitted: AtomicU64,
    alerts_suppressed: AtomicU64,
    alerts_dismissed: AtomicU64,
    commands_processed: AtomicU64,
    commands_dropped: AtomicU64,
    scenario_steps: AtomicU64,
    lockdowns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks_window: AtomicU64::new(0),
            ticks_total: AtomicU64::new(0),
            detections: AtomicU64::new(0),
            alerts_emitted: AtomicU64::new(0),
            alerts_suppressed: AtomicU64::new(0),
            alerts_dismissed: AtomicU64::new(0),
            commands_processed: AtomicU64::new(0),
            commands_dropped: AtomicU64::new(0),
            scenario_steps: AtomicU64::new(0),
            lockdowns: AtomicU64::new(0),
        }
    }

    pub fn record_tick(&self) {
        self.ticks_window.fetch_add(1, Ordering::Relaxed);
        self.ticks_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_emitted(&self) {
        self.alerts_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_suppressed(&self) {
        self.alerts_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert_dismissed(&self) {
        self.alerts_dismissed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_command_dropped(&self) {
        self.commands_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scenario_step(&self) {
        self.scenario_steps.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lockdown(&self) {
        self.lockdowns.fetch_add(1, Ordering::Relaxed);
    }

    /// Produce a summary, resetting the per-interval tick window.
    /// `interval_secs` is the reporter period used for the rate.
    pub fn report(&self, interval_secs: u64) -> MetricsSummary {
        let window_ticks = self.ticks_window.swap(0, Ordering::Relaxed);
        let ticks_per_sec = if interval_secs > 0 {
            window_ticks as f64 / interval_secs as f64
        } else {
            0.0
        };
        MetricsSummary {
            uptime_secs: self.started.elapsed().as_secs(),
            ticks_per_sec,
            ticks_total: self.ticks_total.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            alerts_emitted: self.alerts_emitted.load(Ordering::Relaxed),
            alerts_suppressed: self.alerts_suppressed.load(Ordering::Relaxed),
            alerts_dismissed: self.alerts_dismissed.load(Ordering::Relaxed),
            commands_processed: self.commands_processed.load(Ordering::Relaxed),
            commands_dropped: self.commands_dropped.load(Ordering::Relaxed),
            scenario_steps: self.scenario_steps.load(Ordering::Relaxed),
            lockdowns: self.lockdowns.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time snapshot for logging and dashboard display
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub uptime_secs: u64,
    pub ticks_per_sec: f64,
    pub ticks_total: u64,
    pub detections: u64,
    pub alerts_emitted: u64,
    pub alerts_suppressed: u64,
    pub alerts_dismissed: u64,
    pub commands_processed: u64,
    pub commands_dropped: u64,
    pub scenario_steps: u64,
    pub lockdowns: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            uptime_secs = %self.uptime_secs,
            ticks_per_sec = %format!("{:.1}", self.ticks_per_sec),
            ticks_total = %self.ticks_total,
            detections = %self.detections,
            alerts_emitted = %self.alerts_emitted,
            alerts_suppressed = %self.alerts_suppressed,
            alerts_dismissed = %self.alerts_dismissed,
            commands_processed = %self.commands_processed,
            commands_dropped = %self.commands_dropped,
            scenario_steps = %self.scenario_steps,
            lockdowns = %self.lockdowns,
            "metrics_report"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_detection();
        metrics.record_alert_emitted();
        metrics.record_alert_suppressed();
        metrics.record_command_processed();

        let summary = metrics.report(1);
        assert_eq!(summary.ticks_total, 2);
        assert_eq!(summary.ticks_per_sec, 2.0);
        assert_eq!(summary.detections, 1);
        assert_eq!(summary.alerts_emitted, 1);
        assert_eq!(summary.alerts_suppressed, 1);
        assert_eq!(summary.commands_processed, 1);
    }

    #[test]
    fn test_tick_window_resets_on_report() {
        let metrics = Metrics::new();
        metrics.record_tick();
        let first = metrics.report(1);
        assert_eq!(first.ticks_per_sec, 1.0);

        let second = metrics.report(1);
        assert_eq!(second.ticks_per_sec, 0.0);
        // Cumulative total is unaffected by the window swap
        assert_eq!(second.ticks_total, 1);
    }
}
