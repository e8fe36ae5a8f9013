//! Raw sensor event types delivered by the host platform.

use serde::{Deserialize, Serialize};

/// One accelerometer reading, in m/s² per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    /// Timestamp when the reading was taken (ms since the epoch).
    /// Optional on the live feed, which is stamped on arrival.
    #[serde(default)]
    pub timestamp_ms: i64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn new(timestamp_ms: i64, x: f64, y: f64, z: f64) -> Self {
        Self {
            timestamp_ms,
            x,
            y,
            z,
        }
    }

    /// Euclidean norm of the acceleration vector.
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// A GPS fix.
///
/// Only `speed` feeds drift detection; the location fields are carried for
/// logging and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Timestamp of the fix (ms since the epoch)
    #[serde(default)]
    pub timestamp_ms: i64,
    /// Reported ground speed in m/s, if the receiver provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Horizontal accuracy radius in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Course over ground in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl GpsFix {
    /// A fix carrying only a speed reading.
    pub fn with_speed(timestamp_ms: i64, speed: f64) -> Self {
        Self {
            timestamp_ms,
            speed: Some(speed),
            ..Self::default()
        }
    }
}

/// Unified event type for the collector.
///
/// Serialized as internally tagged JSON, e.g.
/// `{"type":"accel","timestamp_ms":0,"x":0.0,"y":0.0,"z":9.8}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    Accel(AccelSample),
    Gps(GpsFix),
}

impl SensorEvent {
    pub fn timestamp_ms(&self) -> i64 {
        match self {
            SensorEvent::Accel(s) => s.timestamp_ms,
            SensorEvent::Gps(f) => f.timestamp_ms,
        }
    }

    /// Replace the event timestamp, e.g. with the arrival time in live mode.
    pub fn restamp(&mut self, timestamp_ms: i64) {
        match self {
            SensorEvent::Accel(s) => s.timestamp_ms = timestamp_ms,
            SensorEvent::Gps(f) => f.timestamp_ms = timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accel_magnitude() {
        let sample = AccelSample::new(0, 3.0, 4.0, 0.0);
        assert!((sample.magnitude() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_event_json_shape() {
        let event: SensorEvent =
            serde_json::from_str(r#"{"type":"gps","timestamp_ms":42,"speed":1.5}"#).unwrap();
        assert_eq!(event.timestamp_ms(), 42);
        match event {
            SensorEvent::Gps(fix) => {
                assert_eq!(fix.speed, Some(1.5));
                assert_eq!(fix.latitude, None);
            }
            SensorEvent::Accel(_) => panic!("expected a GPS fix"),
        }

        let json = serde_json::to_string(&SensorEvent::Accel(AccelSample::new(7, 0.0, 0.0, 9.8)))
            .unwrap();
        assert!(json.contains(r#""type":"accel""#));
    }

    #[test]
    fn test_gps_fix_without_speed() {
        let event: SensorEvent =
            serde_json::from_str(r#"{"type":"gps","timestamp_ms":1,"latitude":52.1}"#).unwrap();
        assert_eq!(event, SensorEvent::Gps(GpsFix {
            timestamp_ms: 1,
            latitude: Some(52.1),
            ..GpsFix::default()
        }));
    }
}
