//! Session report export.
//!
//! A report is written once at the end of a run so the host can inspect which
//! fixes were flagged. It is an output artifact only and is never read back.

use crate::config::Config;
use crate::core::observer::{DriftRecord, RecordingObserver, StateTransition};
use crate::stats::SessionStatsSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Summary of one replay or live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Where the events came from (trace path or "live")
    pub source: String,
    pub config: Config,
    pub stats: SessionStatsSnapshot,
    pub transitions: Vec<StateTransition>,
    pub drift_events: Vec<DriftRecord>,
}

impl SessionReport {
    /// Assemble a report from what the recorder saw during the session.
    pub fn new(
        source: impl Into<String>,
        config: &Config,
        stats: SessionStatsSnapshot,
        recorder: &RecordingObserver,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: stats.session_start,
            finished_at: Utc::now(),
            source: source.into(),
            config: config.clone(),
            stats,
            transitions: recorder.transitions(),
            drift_events: recorder.drifts(),
        }
    }

    /// Default file name, e.g. `session_20250101_120000.json`.
    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(format!(
            "session_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
