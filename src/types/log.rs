//! Event log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionState;

/// Kind of logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEventType {
    ChatMessage,
    UserAction,
    Fortune,
    Error,
}

/// One log record: event plus the full state at that moment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: LogEventType,
    pub data: serde_json::Value,
    pub turn_count: u32,
    pub user_data: SessionState,
    pub session_id: String,
}

impl LogEntry {
    pub fn new(
        event_type: LogEventType,
        data: serde_json::Value,
        state: &SessionState,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            data,
            turn_count: state.turn_count,
            user_data: state.clone(),
            session_id: session_id.into(),
        }
    }
}
