//! Event log: capped append-only record of everything a session did
//!
//! Oldest entries are dropped past EVENT_LOG_CAPACITY. Export is a plain
//! JSON array; save/load round-trip through a single JSON file.

use std::collections::VecDeque;
use std::path::Path;

use crate::error::Result;
use crate::types::LogEntry;
use crate::EVENT_LOG_CAPACITY;

#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON array of every entry, oldest first
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Write the log to `path`, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.export_json()?)?;
        Ok(())
    }

    /// Read a log written by `save`. Only the newest entries up to the cap are kept.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let entries: Vec<LogEntry> = serde_json::from_str(&json)?;
        let mut log = Self::new();
        for entry in entries {
            log.push(entry);
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::types::{LogEventType, SessionState};

    fn entry(n: u32) -> LogEntry {
        let mut state = SessionState::new();
        state.turn_count = n;
        LogEntry::new(LogEventType::ChatMessage, json!({ "n": n }), &state, "session_test")
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut log = EventLog::new();
        for n in 0..150 {
            log.push(entry(n));
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(log.entries().next().map(|e| e.turn_count), Some(50));
        assert_eq!(log.entries().last().map(|e| e.turn_count), Some(149));
    }

    #[test]
    fn test_export_is_json_array() {
        let mut log = EventLog::new();
        log.push(LogEntry::new(
            LogEventType::UserAction,
            json!({"action": "send"}),
            &SessionState::new(),
            "s1",
        ));
        let exported: serde_json::Value = serde_json::from_str(&log.export_json().unwrap()).unwrap();
        let array = exported.as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0]["type"], "user_action");
        assert_eq!(array[0]["session_id"], "s1");
        assert_eq!(array[0]["user_data"]["composite"]["total"], 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("resort_ti_log_{}", std::process::id()));
        let path = dir.join("events.json");
        let mut log = EventLog::new();
        for n in 0..3 {
            log.push(entry(n));
        }
        log.save(&path).unwrap();

        let loaded = EventLog::load(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.entries().last().map(|e| e.turn_count), Some(2));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(EventLog::load("/nonexistent/resort_ti/events.json").is_err());
    }
}
