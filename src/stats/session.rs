//! Per-session counters.
//!
//! Counts what the agent has processed in this run. Nothing is written to disk;
//! counters start at zero every time the process starts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Session counters, safe to update from both sensor streams.
#[derive(Debug)]
pub struct SessionStats {
    /// Accelerometer samples accepted by the detector
    accel_samples: AtomicU64,
    /// Accelerometer samples rejected as non-finite
    sensor_faults: AtomicU64,
    /// GPS fixes evaluated
    gps_fixes: AtomicU64,
    /// Drift events raised
    drift_events: AtomicU64,
    /// Stationary/moving transitions
    state_changes: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            accel_samples: AtomicU64::new(0),
            sensor_faults: AtomicU64::new(0),
            gps_fixes: AtomicU64::new(0),
            drift_events: AtomicU64::new(0),
            state_changes: AtomicU64::new(0),
            session_start: Utc::now(),
        }
    }

    pub fn record_accel_sample(&self) {
        self.accel_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sensor_fault(&self) {
        self.sensor_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_gps_fix(&self) {
        self.gps_fixes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drift_event(&self) {
        self.drift_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_state_change(&self) {
        self.state_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> SessionStatsSnapshot {
        SessionStatsSnapshot {
            accel_samples: self.accel_samples.load(Ordering::Relaxed),
            sensor_faults: self.sensor_faults.load(Ordering::Relaxed),
            gps_fixes: self.gps_fixes.load(Ordering::Relaxed),
            drift_events: self.drift_events.load(Ordering::Relaxed),
            state_changes: self.state_changes.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session Statistics:\n\
             - Accelerometer samples: {}\n\
             - Rejected samples: {}\n\
             - GPS fixes: {}\n\
             - Drift events: {}\n\
             - State changes: {}\n\
             - Session duration: {} seconds",
            stats.accel_samples,
            stats.sensor_faults,
            stats.gps_fixes,
            stats.drift_events,
            stats.state_changes,
            stats.session_duration_secs
        )
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.accel_samples.store(0, Ordering::Relaxed);
        self.sensor_faults.store(0, Ordering::Relaxed);
        self.gps_fixes.store(0, Ordering::Relaxed);
        self.drift_events.store(0, Ordering::Relaxed);
        self.state_changes.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`SessionStats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatsSnapshot {
    pub accel_samples: u64,
    pub sensor_faults: u64,
    pub gps_fixes: u64,
    pub drift_events: u64,
    pub state_changes: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Thread-safe shared session stats.
pub type SharedSessionStats = Arc<SessionStats>;

/// Create a new shared stats instance.
pub fn create_shared_stats() -> SharedSessionStats {
    Arc::new(SessionStats::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        let stats = SessionStats::new();

        stats.record_accel_sample();
        stats.record_accel_sample();
        stats.record_gps_fix();
        stats.record_drift_event();

        let snapshot = stats.stats();
        assert_eq!(snapshot.accel_samples, 2);
        assert_eq!(snapshot.gps_fixes, 1);
        assert_eq!(snapshot.drift_events, 1);
        assert_eq!(snapshot.sensor_faults, 0);
    }

    #[test]
    fn test_reset() {
        let stats = create_shared_stats();
        stats.record_state_change();
        stats.record_sensor_fault();
        stats.reset();

        let snapshot = stats.stats();
        assert_eq!(snapshot.state_changes, 0);
        assert_eq!(snapshot.sensor_faults, 0);
    }

    #[test]
    fn test_summary_format() {
        let summary = SessionStats::new().summary();
        assert!(summary.contains("Accelerometer samples"));
        assert!(summary.contains("Drift events"));
    }
}
