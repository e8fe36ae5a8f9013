//! Observers for classification side effects.
//!
//! The detector and drift monitor only return values. Anything that should
//! happen as a consequence (logging, UI updates, reports) hangs off a
//! [`MotionObserver`] registered with the pipeline.

use crate::collector::types::GpsFix;
use crate::core::detector::{DetectionResult, SensorFault};
use crate::core::drift::DriftEvent;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Receives classification events. All methods default to no-ops.
pub trait MotionObserver: Send + Sync {
    /// Called on the result that flipped the stationary flag.
    fn on_state_change(&self, _result: &DetectionResult) {}

    /// Called when a fix disagrees with the stationary classification.
    fn on_drift(&self, _event: &DriftEvent, _fix: &GpsFix) {}

    /// Called when an accelerometer sample was rejected.
    fn on_sensor_fault(&self, _fault: &SensorFault) {}
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MotionObserver for TracingObserver {
    fn on_state_change(&self, result: &DetectionResult) {
        if result.is_stationary {
            tracing::info!(
                mean = result.mean,
                std = result.standard_deviation,
                quiet_ms = result.duration_ms,
                "Device became stationary"
            );
        } else {
            tracing::info!(
                mean = result.mean,
                std = result.standard_deviation,
                "Device started moving"
            );
        }
    }

    fn on_drift(&self, event: &DriftEvent, fix: &GpsFix) {
        tracing::warn!(
            speed = event.gps_speed,
            latitude = ?fix.latitude,
            longitude = ?fix.longitude,
            accuracy = ?fix.accuracy,
            "GPS drift: receiver reports motion while device is stationary"
        );
    }

    fn on_sensor_fault(&self, fault: &SensorFault) {
        tracing::debug!("Discarding sample: {}", fault);
    }
}

/// A stationary/moving transition as recorded for reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub timestamp_ms: i64,
    pub stationary: bool,
    pub mean: f64,
    pub standard_deviation: f64,
}

impl From<&DetectionResult> for StateTransition {
    fn from(result: &DetectionResult) -> Self {
        Self {
            timestamp_ms: result.timestamp_ms,
            stationary: result.is_stationary,
            mean: result.mean,
            standard_deviation: result.standard_deviation,
        }
    }
}

/// A drift event together with the fix that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftRecord {
    pub event: DriftEvent,
    pub fix: GpsFix,
}

/// Keeps every transition and drift event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    transitions: Mutex<Vec<StateTransition>>,
    drifts: Mutex<Vec<DriftRecord>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<StateTransition> {
        self.transitions
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    pub fn drifts(&self) -> Vec<DriftRecord> {
        self.drifts.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl MotionObserver for RecordingObserver {
    fn on_state_change(&self, result: &DetectionResult) {
        if let Ok(mut transitions) = self.transitions.lock() {
            transitions.push(StateTransition::from(result));
        }
    }

    fn on_drift(&self, event: &DriftEvent, fix: &GpsFix) {
        if let Ok(mut drifts) = self.drifts.lock() {
            drifts.push(DriftRecord {
                event: *event,
                fix: *fix,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition_result(stationary: bool) -> DetectionResult {
        DetectionResult {
            is_stationary: stationary,
            mean: 0.05,
            standard_deviation: 0.01,
            duration_ms: 2000,
            state_changed: true,
            timestamp_ms: 1234,
        }
    }

    #[test]
    fn test_recording_observer() {
        let observer = RecordingObserver::new();
        observer.on_state_change(&transition_result(true));
        observer.on_drift(
            &DriftEvent {
                gps_speed: 0.7,
                stationary: true,
            },
            &GpsFix::with_speed(1500, 0.7),
        );

        let transitions = observer.transitions();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].timestamp_ms, 1234);
        assert!(transitions[0].stationary);

        let drifts = observer.drifts();
        assert_eq!(drifts.len(), 1);
        assert_eq!(drifts[0].fix.timestamp_ms, 1500);
    }

    #[test]
    fn test_default_methods_are_noops() {
        struct Silent;
        impl MotionObserver for Silent {}

        let observer = Silent;
        observer.on_state_change(&transition_result(false));
        observer.on_sensor_fault(&SensorFault::NonFinite {
            x: f64::NAN,
            y: 0.0,
            z: 0.0,
        });
    }
}
