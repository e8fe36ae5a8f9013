//! Core classification logic.
//!
//! This module contains:
//! - The time-bounded deviation window
//! - The debounced stationary detector
//! - The GPS drift decision rule
//! - Observer hooks and the pipeline that ties them together

pub mod clock;
pub mod detector;
pub mod drift;
pub mod observer;
pub mod pipeline;
pub mod window;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use detector::{
    create_shared_detector, DetectionResult, DetectorConfig, MotionPhase, SensorFault,
    SharedDetector, StationaryDetector, StationaryHandle, StationaryState, STANDARD_GRAVITY,
};
pub use drift::{DriftEvent, DriftMonitor, GPS_DRIFT_SPEED_THRESHOLD};
pub use observer::{
    DriftRecord, MotionObserver, RecordingObserver, StateTransition, TracingObserver,
};
pub use pipeline::{MotionPipeline, PipelineOutput};
pub use window::{DetectionWindow, DeviationSample};
