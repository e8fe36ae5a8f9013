//! Stationary Drift Agent - accelerometer-based rest detection with GPS
//! drift cross-checking.
//!
//! A stream of 3-axis accelerometer samples decides whether the device is
//! physically at rest. GPS fixes that report motion while the device is at rest
//! are flagged as drift so location-aware applications can suppress or annotate
//! the jitter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Stationary Drift Agent                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │  Collector  │──▶│ Stationary  │──▶│   Drift     │       │
//! │  │ (JSON feed) │   │  Detector   │   │  Monitor    │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         │                 │                  │              │
//! │         ▼                 ▼                  ▼              │
//! │  ┌─────────────┐   ┌─────────────────────────────┐         │
//! │  │   Session   │   │ Observers (log / report)    │         │
//! │  │    Stats    │   └─────────────────────────────┘         │
//! │  └─────────────┘                                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use stationary_drift_agent::core::{DetectorConfig, DriftMonitor, StationaryDetector};
//!
//! let mut detector = StationaryDetector::new(DetectorConfig::default());
//! let monitor = DriftMonitor::new(detector.handle());
//!
//! // 4 seconds of a phone lying flat on a table, sampled at 10 Hz.
//! for i in 0..40 {
//!     detector.detect_stationary_at(0.0, 0.0, 9.8, i * 100).unwrap();
//! }
//! assert!(detector.is_stationary());
//!
//! // The GPS receiver still claims 0.6 m/s.
//! assert!(monitor.on_fix(Some(0.6)).is_some());
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod report;
pub mod stats;

// Re-export key types at crate root for convenience
pub use crate::collector::{Collector, CollectorConfig, CollectorError, SensorEvent};
pub use crate::config::{Config, ConfigError};
pub use crate::core::{
    DetectionResult, DetectorConfig, DriftEvent, DriftMonitor, MotionObserver, MotionPipeline,
    SensorFault, StationaryDetector, GPS_DRIFT_SPEED_THRESHOLD,
};
pub use crate::report::SessionReport;
pub use crate::stats::{SessionStats, SharedSessionStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
