//! Stationary-state classification from accelerometer samples.
//!
//! Each sample is reduced to its deviation from standard gravity and pushed into
//! a time-bounded [`DetectionWindow`]. Once the window holds enough samples, its
//! rolling mean and population standard deviation decide whether the device is
//! currently quiet. The device is only declared stationary after it has been
//! quiet continuously for the configured dwell time; it is declared moving again
//! on the first sample that breaks the quiet condition.
//!
//! ```text
//!   PENDING ──(min samples)──▶ MOVING ◀──(not quiet)── STATIONARY
//!                                 │                        ▲
//!                                 └──(quiet for dwell)─────┘
//! ```

use crate::config::ConfigError;
use crate::core::clock::{Clock, SystemClock};
use crate::core::window::{DetectionWindow, DeviationSample};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Standard gravity used as the at-rest acceleration magnitude (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.8;

/// Tuning for [`StationaryDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Length of the retained sample window
    pub history_duration_ms: i64,
    /// Max rolling mean deviation to count as quiet (m/s²)
    pub mean_threshold: f64,
    /// Max rolling standard deviation to count as quiet (m/s²)
    pub std_threshold: f64,
    /// Continuous quiet time required before declaring stationary
    pub stationary_duration_ms: i64,
    /// Samples required in the window before classifying at all
    pub min_sample_count: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            history_duration_ms: 2000,
            mean_threshold: 0.3,
            std_threshold: 0.2,
            stationary_duration_ms: 2000,
            min_sample_count: 10,
        }
    }
}

impl DetectorConfig {
    /// Reject configurations that would make classification meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_duration_ms <= 0 {
            return Err(ConfigError::Invalid(
                "history_duration_ms must be positive".to_string(),
            ));
        }
        if !(self.mean_threshold.is_finite() && self.mean_threshold > 0.0) {
            return Err(ConfigError::Invalid(
                "mean_threshold must be a positive number".to_string(),
            ));
        }
        if !(self.std_threshold.is_finite() && self.std_threshold > 0.0) {
            return Err(ConfigError::Invalid(
                "std_threshold must be a positive number".to_string(),
            ));
        }
        if self.stationary_duration_ms < 0 {
            return Err(ConfigError::Invalid(
                "stationary_duration_ms must not be negative".to_string(),
            ));
        }
        if self.min_sample_count == 0 {
            return Err(ConfigError::Invalid(
                "min_sample_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stationary flag plus the start of the current quiet streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationaryState {
    pub is_stationary: bool,
    /// Set when the quiet condition is first met, cleared when it breaks
    pub stationary_since_ms: Option<i64>,
}

/// Coarse classification phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPhase {
    /// Not enough samples yet
    Pending,
    Moving,
    Stationary,
}

/// Outcome of one classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_stationary: bool,
    pub mean: f64,
    pub standard_deviation: f64,
    /// Time since the current quiet streak began (0 outside a streak)
    pub duration_ms: i64,
    /// True only on the call that flipped `is_stationary`
    pub state_changed: bool,
    /// Time at which this classification was made
    pub timestamp_ms: i64,
}

impl DetectionResult {
    /// Neutral result returned while the window is still filling.
    fn pending(timestamp_ms: i64) -> Self {
        Self {
            is_stationary: false,
            mean: 0.0,
            standard_deviation: 0.0,
            duration_ms: 0,
            state_changed: false,
            timestamp_ms,
        }
    }
}

/// A sample that cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorFault {
    /// An axis reading (or the resulting magnitude) was NaN or infinite
    NonFinite { x: f64, y: f64, z: f64 },
}

impl std::fmt::Display for SensorFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorFault::NonFinite { x, y, z } => {
                write!(f, "Non-finite accelerometer sample ({x}, {y}, {z})")
            }
        }
    }
}

impl std::error::Error for SensorFault {}

/// Lock-free, read-only view of the detector's latest stationary flag.
///
/// Cloned into consumers on other threads (e.g. the GPS callback) so they can
/// read the current state without contending on the detector itself.
#[derive(Debug, Clone)]
pub struct StationaryHandle {
    stationary: Arc<AtomicBool>,
}

impl StationaryHandle {
    pub fn is_stationary(&self) -> bool {
        self.stationary.load(Ordering::Acquire)
    }
}

/// Debounced stationary/moving classifier over an accelerometer stream.
pub struct StationaryDetector {
    config: DetectorConfig,
    window: DetectionWindow,
    state: StationaryState,
    /// Whether a full-window classification has happened since creation or reset
    classified: bool,
    published: Arc<AtomicBool>,
    clock: Arc<dyn Clock>,
}

impl StationaryDetector {
    /// Create a detector that timestamps samples with the system clock.
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a detector with an explicit time source.
    pub fn with_clock(config: DetectorConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: DetectionWindow::new(config.history_duration_ms),
            config,
            state: StationaryState::default(),
            classified: false,
            published: Arc::new(AtomicBool::new(false)),
            clock,
        }
    }

    /// Classify a new accelerometer reading (m/s²) at the clock's current time.
    pub fn detect_stationary(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<DetectionResult, SensorFault> {
        let now_ms = self.clock.now_ms();
        self.detect_stationary_at(x, y, z, now_ms)
    }

    /// Classify a new accelerometer reading taken at `now_ms`.
    ///
    /// Non-finite readings are rejected without touching the window or state.
    pub fn detect_stationary_at(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        now_ms: i64,
    ) -> Result<DetectionResult, SensorFault> {
        let magnitude = (x * x + y * y + z * z).sqrt();
        if !magnitude.is_finite() {
            return Err(SensorFault::NonFinite { x, y, z });
        }
        let deviation = (magnitude - STANDARD_GRAVITY).abs();

        self.window.push(DeviationSample::new(deviation, now_ms));

        if self.window.len() < self.config.min_sample_count {
            return Ok(DetectionResult::pending(now_ms));
        }
        self.classified = true;

        let mean = self.window.mean();
        let standard_deviation = self.window.std_dev();
        let currently_quiet =
            mean < self.config.mean_threshold && standard_deviation < self.config.std_threshold;

        let mut state_changed = false;
        if currently_quiet {
            let since = *self.state.stationary_since_ms.get_or_insert(now_ms);
            let dwell_ms = now_ms.saturating_sub(since);
            if !self.state.is_stationary && dwell_ms >= self.config.stationary_duration_ms {
                self.state.is_stationary = true;
                state_changed = true;
            }
        } else {
            self.state.stationary_since_ms = None;
            if self.state.is_stationary {
                self.state.is_stationary = false;
                state_changed = true;
            }
        }

        let duration_ms = self
            .state
            .stationary_since_ms
            .map_or(0, |since| now_ms.saturating_sub(since));

        self.published
            .store(self.state.is_stationary, Ordering::Release);

        Ok(DetectionResult {
            is_stationary: self.state.is_stationary,
            mean,
            standard_deviation,
            duration_ms,
            state_changed,
            timestamp_ms: now_ms,
        })
    }

    /// Last computed stationary flag.
    pub fn is_stationary(&self) -> bool {
        self.state.is_stationary
    }

    pub fn state(&self) -> StationaryState {
        self.state
    }

    pub fn phase(&self) -> MotionPhase {
        if !self.classified {
            MotionPhase::Pending
        } else if self.state.is_stationary {
            MotionPhase::Stationary
        } else {
            MotionPhase::Moving
        }
    }

    /// Number of samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.window.len()
    }

    /// Handle for reading the stationary flag from other threads.
    pub fn handle(&self) -> StationaryHandle {
        StationaryHandle {
            stationary: Arc::clone(&self.published),
        }
    }

    /// Discard all history and return to the pending phase.
    pub fn reset(&mut self) {
        self.window.clear();
        self.state = StationaryState::default();
        self.classified = false;
        self.published.store(false, Ordering::Release);
    }
}

/// Detector shared between threads that deliver accelerometer callbacks.
pub type SharedDetector = Arc<Mutex<StationaryDetector>>;

/// Create a new shared detector using the system clock.
pub fn create_shared_detector(config: DetectorConfig) -> SharedDetector {
    Arc::new(Mutex::new(StationaryDetector::new(config)))
}
