//! Chat turn model
//!
//! - Turn = one user utterance plus the reply shown for it
//! - History = bounded window of the most recent turns, sent to the backend

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::HISTORY_WINDOW_TURNS;

/// One completed rally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Turn number (1-based, equals turn_count after the turn)
    #[serde(rename = "turn")]
    pub number: u32,
    pub user_message: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a new turn with current timestamp
    pub fn new(number: u32, user_message: impl Into<String>, bot_response: impl Into<String>) -> Self {
        Self {
            number,
            user_message: user_message.into(),
            bot_response: bot_response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Sliding window over the most recent turns
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryWindow {
    /// Window holding the default number of turns (5)
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_WINDOW_TURNS)
    }

    /// Window with custom capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add a turn, dropping the oldest beyond capacity
    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Turns, oldest first
    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    /// Owned copy for request payloads
    pub fn to_vec(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_turn() {
        let turn = ChatTurn::new(1, "こんにちは", "ようこそ");
        assert_eq!(turn.number, 1);
        assert_eq!(turn.user_message, "こんにちは");
    }

    #[test]
    fn test_window_keeps_last_five() {
        let mut window = HistoryWindow::new();
        assert!(window.is_empty());

        for i in 1..=7 {
            window.push(ChatTurn::new(i, format!("msg {}", i), "ok"));
        }

        assert_eq!(window.len(), 5);
        let numbers: Vec<u32> = window.turns().map(|t| t.number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6, 7]);
        assert_eq!(window.last().map(|t| t.number), Some(7));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut window = HistoryWindow::with_capacity(0);
        window.push(ChatTurn::new(1, "a", "b"));
        window.push(ChatTurn::new(2, "c", "d"));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let turn = ChatTurn::new(3, "u", "b");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["turn"], 3);
        assert_eq!(json["user_message"], "u");
        assert_eq!(json["bot_response"], "b");
    }
}
