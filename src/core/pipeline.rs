//! Wires the detector, drift monitor and observers to a single event stream.

use crate::collector::types::{AccelSample, GpsFix, SensorEvent};
use crate::config::Config;
use crate::core::detector::{DetectionResult, SensorFault, StationaryDetector};
use crate::core::drift::{DriftEvent, DriftMonitor};
use crate::core::observer::MotionObserver;
use crate::stats::{create_shared_stats, SharedSessionStats};
use std::sync::Arc;

/// What one event produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineOutput {
    /// An accelerometer sample was classified
    Detection(DetectionResult),
    /// An accelerometer sample was rejected
    SensorFault(SensorFault),
    /// A GPS fix was evaluated
    Fix(Option<DriftEvent>),
}

/// Routes sensor events through classification and notifies observers.
///
/// Accelerometer samples are classified at their own timestamps, which keeps
/// replays of recorded traces deterministic.
pub struct MotionPipeline {
    detector: StationaryDetector,
    monitor: DriftMonitor,
    observers: Vec<Arc<dyn MotionObserver>>,
    stats: SharedSessionStats,
}

impl MotionPipeline {
    pub fn new(detector: StationaryDetector, drift_threshold: f64) -> Self {
        let monitor = DriftMonitor::with_threshold(detector.handle(), drift_threshold);
        Self {
            detector,
            monitor,
            observers: Vec::new(),
            stats: create_shared_stats(),
        }
    }

    /// Build a pipeline from the agent configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            StationaryDetector::new(config.detector.clone()),
            config.drift_speed_threshold,
        )
    }

    pub fn add_observer(&mut self, observer: Arc<dyn MotionObserver>) {
        self.observers.push(observer);
    }

    pub fn handle_event(&mut self, event: &SensorEvent) -> PipelineOutput {
        match event {
            SensorEvent::Accel(sample) => self.handle_accel(sample),
            SensorEvent::Gps(fix) => PipelineOutput::Fix(self.handle_fix(fix)),
        }
    }

    pub fn handle_accel(&mut self, sample: &AccelSample) -> PipelineOutput {
        match self
            .detector
            .detect_stationary_at(sample.x, sample.y, sample.z, sample.timestamp_ms)
        {
            Ok(result) => {
                self.stats.record_accel_sample();
                if result.state_changed {
                    self.stats.record_state_change();
                    for observer in &self.observers {
                        observer.on_state_change(&result);
                    }
                }
                PipelineOutput::Detection(result)
            }
            Err(fault) => {
                self.stats.record_sensor_fault();
                for observer in &self.observers {
                    observer.on_sensor_fault(&fault);
                }
                PipelineOutput::SensorFault(fault)
            }
        }
    }

    pub fn handle_fix(&self, fix: &GpsFix) -> Option<DriftEvent> {
        self.stats.record_gps_fix();
        let drift = self.monitor.on_fix(fix.speed);
        if let Some(ref event) = drift {
            self.stats.record_drift_event();
            for observer in &self.observers {
                observer.on_drift(event, fix);
            }
        }
        drift
    }

    pub fn detector(&self) -> &StationaryDetector {
        &self.detector
    }

    pub fn monitor(&self) -> &DriftMonitor {
        &self.monitor
    }

    pub fn stats(&self) -> &SharedSessionStats {
        &self.stats
    }

    /// Discard detector history; the drift monitor follows automatically.
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
