//! JSON-lines parsing of recorded or piped sensor feeds.
//!
//! One event per line, blank lines and lines starting with `#` ignored:
//!
//! ```text
//! # rest, then a phantom 0.6 m/s fix
//! {"type":"accel","timestamp_ms":0,"x":0.01,"y":-0.02,"z":9.79}
//! {"type":"gps","timestamp_ms":2500,"speed":0.6,"latitude":52.37,"longitude":4.89}
//! ```

use crate::collector::types::SensorEvent;
use std::io::BufRead;
use std::path::Path;

/// Errors that can occur while collecting events.
#[derive(Debug)]
pub enum CollectorError {
    AlreadyRunning,
    Io(String),
    Parse { line: usize, message: String },
}

impl std::fmt::Display for CollectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectorError::AlreadyRunning => write!(f, "Collector is already running"),
            CollectorError::Io(e) => write!(f, "IO error: {e}"),
            CollectorError::Parse { line, message } => {
                write!(f, "Parse error on line {line}: {message}")
            }
        }
    }
}

impl std::error::Error for CollectorError {}

/// Parse a single line. Returns `Ok(None)` for blank and comment lines.
///
/// `line_number` is 1-based and only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<SensorEvent>, CollectorError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CollectorError::Parse {
            line: line_number,
            message: e.to_string(),
        })
}

/// Parse a line of a recorded trace.
///
/// Unlike the live feed, which is stamped on arrival, a recorded trace has no
/// other source of time, so every event must carry `timestamp_ms`.
pub fn parse_recorded_line(
    line: &str,
    line_number: usize,
) -> Result<Option<SensorEvent>, CollectorError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parse_error = |message: String| CollectorError::Parse {
        line: line_number,
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| parse_error(e.to_string()))?;
    if value.get("timestamp_ms").is_none() {
        return Err(parse_error("missing timestamp_ms".to_string()));
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| parse_error(e.to_string()))
}

/// Read every event from a recorded trace, stopping at the first bad line.
pub fn read_events<R: BufRead>(input: R) -> Result<Vec<SensorEvent>, CollectorError> {
    let mut events = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.map_err(|e| CollectorError::Io(e.to_string()))?;
        if let Some(event) = parse_recorded_line(&line, index + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Read a JSON-lines trace file.
pub fn read_trace(path: &Path) -> Result<Vec<SensorEvent>, CollectorError> {
    let file = std::fs::File::open(path)
        .map_err(|e| CollectorError::Io(format!("{}: {e}", path.display())))?;
    read_events(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("   ", 2).unwrap().is_none());
        assert!(parse_line("# header", 3).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_line("{not json", 7).unwrap_err();
        match err {
            CollectorError::Parse { line, .. } => assert_eq!(line, 7),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_events() {
        let input = "\
# trace
{\"type\":\"accel\",\"timestamp_ms\":0,\"x\":0.0,\"y\":0.0,\"z\":9.8}

{\"type\":\"gps\",\"timestamp_ms\":100,\"speed\":0.4}
";
        let events = read_events(Cursor::new(input)).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].timestamp_ms(), 100);
    }

    #[test]
    fn test_live_line_may_omit_timestamp() {
        let event = parse_line(r#"{"type":"gps","speed":0.4}"#, 1)
            .unwrap()
            .unwrap();
        assert_eq!(event.timestamp_ms(), 0);
    }

    #[test]
    fn test_recorded_trace_requires_timestamps() {
        let input = "\
{\"type\":\"accel\",\"timestamp_ms\":0,\"x\":0.0,\"y\":0.0,\"z\":9.8}
{\"type\":\"accel\",\"x\":0.0,\"y\":0.0,\"z\":9.8}
";
        match read_events(Cursor::new(input)).unwrap_err() {
            CollectorError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("timestamp_ms"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(parse_recorded_line("# comment", 1).unwrap().is_none());
        assert!(parse_recorded_line(r#"{"type":"gps","timestamp_ms":5}"#, 1)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_read_trace_missing_file() {
        let path = std::env::temp_dir().join("stationary-drift-agent-missing-trace.jsonl");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(read_trace(&path), Err(CollectorError::Io(_))));
    }
}
