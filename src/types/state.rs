//! Timing gate status definitions

use serde::{Deserialize, Serialize};
use crate::{TIMING_THRESHOLD_APPROACHING, TIMING_THRESHOLD_READY};

/// Three-tier readiness for proposing a fortune menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimingStatus {
    /// timing_score < 50
    NotReady,
    /// 50 <= timing_score < 70
    Approaching,
    /// timing_score >= 70, menus are proposed
    Ready,
}

impl TimingStatus {
    /// Classify a timing score
    pub fn from_score(score: u32) -> Self {
        if score >= TIMING_THRESHOLD_READY {
            TimingStatus::Ready
        } else if score >= TIMING_THRESHOLD_APPROACHING {
            TimingStatus::Approaching
        } else {
            TimingStatus::NotReady
        }
    }

    pub fn is_ready(&self) -> bool {
        *self == TimingStatus::Ready
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            TimingStatus::NotReady => "\x1b[90m",    // Gray
            TimingStatus::Approaching => "\x1b[33m", // Yellow
            TimingStatus::Ready => "\x1b[35m",       // Magenta
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for status
    pub fn emoji(&self) -> &'static str {
        match self {
            TimingStatus::NotReady => "⏳",
            TimingStatus::Approaching => "🌙",
            TimingStatus::Ready => "🔮",
        }
    }
}

impl std::fmt::Display for TimingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimingStatus::NotReady => "NOT_READY",
            TimingStatus::Approaching => "APPROACHING",
            TimingStatus::Ready => "READY",
        };
        write!(f, "{}", name)
    }
}
