//! Output structures handed to the host for display

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{
    CompositeFactor, FortuneContent, NeedKind, ReplySource, SelectedCategory, SessionState,
    TimingStatus,
};

/// A menu with its computed match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMenu {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 0 ..= 100
    pub match_score: u32,
}

/// Result of running the local pipeline on one utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAnalysis {
    pub timestamp: DateTime<Utc>,
    /// turn_count after this utterance
    pub turn: u32,
    pub timing_score: u32,
    pub status: TimingStatus,
    /// Top menus; empty unless the gate is ready
    pub suggestions: Vec<RankedMenu>,
    /// State after the update
    pub snapshot: SessionState,
}

impl TurnAnalysis {
    pub fn new(
        snapshot: SessionState,
        suggestions: Vec<RankedMenu>,
    ) -> Self {
        let status = TimingStatus::from_score(snapshot.timing_score);
        Self {
            timestamp: Utc::now(),
            turn: snapshot.turn_count,
            timing_score: snapshot.timing_score,
            status,
            suggestions,
            snapshot,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.status.color_code();
        let reset = TimingStatus::color_reset();
        format!(
            "{}{} turn={} | timing={} | status={} | RESORT-TI={} | data={:.0}%{}",
            color,
            self.status.emoji(),
            self.turn,
            self.timing_score,
            self.status,
            self.snapshot.composite.total(),
            self.snapshot.completeness.total(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "turn={} | timing={} | status={} | resort_ti={} | data={:.1} | sentiment={}",
            self.turn,
            self.timing_score,
            self.status,
            self.snapshot.composite.total(),
            self.snapshot.completeness.total(),
            self.snapshot.sentiment.dominant,
        )
    }

    /// Multi-line breakdown of every score
    pub fn to_breakdown_string(&self) -> String {
        let s = &self.snapshot;
        let mut out = String::new();
        out.push_str("needs:\n");
        for kind in NeedKind::ALL {
            out.push_str(&format!("  {:<22} {:>6.1}\n", kind.as_str(), s.needs.get(kind)));
        }
        out.push_str(&format!(
            "sentiment: polarity={:.2} intensity={:.2} label={}\n",
            s.sentiment.polarity, s.sentiment.intensity, s.sentiment.dominant
        ));
        out.push_str("completeness:\n");
        for cat in crate::types::DataCategory::ALL {
            out.push_str(&format!("  {:<22} {:>6.1}\n", cat.as_str(), s.completeness.get(cat)));
        }
        out.push_str(&format!("  {:<22} {:>6.1}\n", "total", s.completeness.total()));
        out.push_str("resort-ti:\n");
        for factor in CompositeFactor::ALL {
            out.push_str(&format!(
                "  {} {:<20} {:>6.1}\n",
                factor.letter(),
                factor.as_str(),
                s.composite.get(factor)
            ));
        }
        out.push_str(&format!("  {:<22} {:>6.0}\n", "total", s.composite.total()));
        out
    }
}

/// What the host shows after one message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub source: ReplySource,
    pub category: Option<SelectedCategory>,
    pub analysis: TurnAnalysis,
}

/// A fortune reading ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortuneResult {
    pub menu_id: String,
    pub title: String,
    pub content: String,
    pub key_points: Vec<String>,
    pub advice: String,
    /// True when the text came from the remote backend
    pub remote: bool,
}

impl FortuneResult {
    /// Static reading from the lexicon tables
    pub fn from_static(content: &FortuneContent) -> Self {
        Self {
            menu_id: content.menu_id.clone(),
            title: content.title.clone(),
            content: content.content.clone(),
            key_points: content.key_points.clone(),
            advice: content.advice.clone(),
            remote: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derived_from_snapshot() {
        let mut state = SessionState::new();
        state.turn_count = 4;
        state.timing_score = 65;
        let analysis = TurnAnalysis::new(state, Vec::new());
        assert_eq!(analysis.turn, 4);
        assert_eq!(analysis.status, TimingStatus::Approaching);
        assert!(analysis.to_parseable_string().contains("status=APPROACHING"));
    }

    #[test]
    fn test_breakdown_lists_every_factor() {
        let analysis = TurnAnalysis::new(SessionState::new(), Vec::new());
        let text = analysis.to_breakdown_string();
        for factor in CompositeFactor::ALL {
            assert!(text.contains(factor.as_str()));
        }
        for kind in NeedKind::ALL {
            assert!(text.contains(kind.as_str()));
        }
    }
}
