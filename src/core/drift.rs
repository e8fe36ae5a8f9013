//! GPS drift detection.
//!
//! A fix that reports motion while the accelerometer says the device is at rest
//! is flagged as drift. The monitor only reads the detector's latest state; it
//! never tries to align the two streams in time.

use crate::core::detector::StationaryHandle;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Speed above which a fix on a stationary device counts as drift (m/s).
pub const GPS_DRIFT_SPEED_THRESHOLD: f64 = 0.3;

/// A GPS fix that disagrees with the stationary classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftEvent {
    /// Speed reported by the receiver (m/s)
    pub gps_speed: f64,
    /// Stationary flag at the moment the fix arrived
    pub stationary: bool,
}

/// Cross-checks GPS speed against the stationary detector.
#[derive(Debug)]
pub struct DriftMonitor {
    detector: StationaryHandle,
    threshold: f64,
    drift_count: AtomicU64,
}

impl DriftMonitor {
    pub fn new(detector: StationaryHandle) -> Self {
        Self::with_threshold(detector, GPS_DRIFT_SPEED_THRESHOLD)
    }

    pub fn with_threshold(detector: StationaryHandle, threshold: f64) -> Self {
        Self {
            detector,
            threshold,
            drift_count: AtomicU64::new(0),
        }
    }

    /// Evaluate a fix. Missing or non-finite speed is treated as 0.
    pub fn on_fix(&self, speed: Option<f64>) -> Option<DriftEvent> {
        let speed = speed.filter(|s| s.is_finite()).unwrap_or(0.0);

        if self.detector.is_stationary() && speed > self.threshold {
            self.drift_count.fetch_add(1, Ordering::Relaxed);
            Some(DriftEvent {
                gps_speed: speed,
                stationary: true,
            })
        } else {
            None
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of drift events raised so far.
    pub fn drift_count(&self) -> u64 {
        self.drift_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::detector::{DetectorConfig, StationaryDetector, STANDARD_GRAVITY};
    use std::sync::Arc;

    fn detector(stationary: bool) -> StationaryDetector {
        let mut detector =
            StationaryDetector::with_clock(DetectorConfig::default(), Arc::new(ManualClock::new(0)));
        let z = if stationary {
            STANDARD_GRAVITY
        } else {
            STANDARD_GRAVITY + 3.0
        };
        for i in 0..40 {
            let jitter = if stationary || i % 2 == 0 { 0.0 } else { 2.0 };
            detector
                .detect_stationary_at(jitter, 0.0, z, i * 100)
                .unwrap();
        }
        assert_eq!(detector.is_stationary(), stationary);
        detector
    }

    #[test]
    fn test_drift_when_stationary_and_fast() {
        let detector = detector(true);
        let monitor = DriftMonitor::new(detector.handle());

        let event = monitor.on_fix(Some(0.5)).unwrap();
        assert_eq!(event.gps_speed, 0.5);
        assert!(event.stationary);
        assert_eq!(monitor.drift_count(), 1);
    }

    #[test]
    fn test_no_drift_below_threshold() {
        let detector = detector(true);
        let monitor = DriftMonitor::new(detector.handle());

        assert!(monitor.on_fix(Some(0.1)).is_none());
        // Strictly greater than the threshold.
        assert!(monitor.on_fix(Some(GPS_DRIFT_SPEED_THRESHOLD)).is_none());
        assert_eq!(monitor.drift_count(), 0);
    }

    #[test]
    fn test_no_drift_when_moving() {
        let detector = detector(false);
        let monitor = DriftMonitor::new(detector.handle());

        assert!(monitor.on_fix(Some(5.0)).is_none());
    }

    #[test]
    fn test_missing_speed_treated_as_zero() {
        let detector = detector(true);
        let monitor = DriftMonitor::new(detector.handle());

        assert!(monitor.on_fix(None).is_none());
        assert!(monitor.on_fix(Some(f64::NAN)).is_none());
    }

    #[test]
    fn test_monitor_follows_detector_state() {
        let mut detector = detector(true);
        let monitor = DriftMonitor::with_threshold(detector.handle(), 1.0);
        assert_eq!(monitor.threshold(), 1.0);

        assert!(monitor.on_fix(Some(1.5)).is_some());

        detector.reset();
        assert!(monitor.on_fix(Some(1.5)).is_none());
    }
}
