//! Session statistics for the agent.

pub mod session;

// Re-export commonly used types
pub use session::{create_shared_stats, SessionStats, SessionStatsSnapshot, SharedSessionStats};
