//! Event collection module.
//!
//! Subscribing to the platform's accelerometer and location APIs happens outside
//! this crate. The host bridge hands events over either as a recorded JSON-lines
//! trace or as a live line feed, and this module turns them into typed
//! [`SensorEvent`]s.

pub mod line;
pub mod reader;
pub mod types;

// Re-export commonly used types
pub use line::{CollectorConfig, LineCollector};
pub use reader::{parse_line, parse_recorded_line, read_events, read_trace, CollectorError};
pub use types::{AccelSample, GpsFix, SensorEvent};

/// Platform-agnostic collector type alias
pub type Collector = LineCollector;
