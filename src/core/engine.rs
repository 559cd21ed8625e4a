//! Analysis Engine: runs the per-utterance pipeline against an owned SessionState
//!
//! Order per accepted utterance:
//! 1. turn_count += 1
//! 2. needs (smoothed)
//! 3. sentiment (overwrite)
//! 4. completeness (additive)
//! 5. composite (additive, uses the new turn_count)
//! 6. timing score
//! 7. menu suggestions when the gate is ready
//!
//! Remote overrides are applied on a working copy and committed in one step.
//! The timing score is re-read from the overridden state unless the remote
//! answer carries its own.

use std::sync::Arc;

use tracing::debug;

use crate::{clamp_score, MENU_SUGGESTION_COUNT};
use crate::core::{
    CategorySelector, CompletenessTracker, CompositeCalculator, Lexicon, MenuRanker,
    NeedDetector, SentimentEstimator, TimingGate,
};
use crate::types::{
    ChatTurnResponse, CompositeFactor, CompositeIndex, NeedKind, RankedMenu, SelectedCategory, SentimentLabel,
    SessionState, TimingStatus, TurnAnalysis,
};

/// The full local scoring pipeline
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    lexicon: Arc<Lexicon>,
    needs: NeedDetector,
    sentiment: SentimentEstimator,
    completeness: CompletenessTracker,
    composite: CompositeCalculator,
    gate: TimingGate,
    ranker: MenuRanker,
    selector: CategorySelector,
    suggestion_count: usize,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl AnalysisEngine {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            needs: NeedDetector::new(lexicon.clone()),
            sentiment: SentimentEstimator::new(lexicon.clone()),
            completeness: CompletenessTracker::new(lexicon.clone()),
            composite: CompositeCalculator::new(),
            gate: TimingGate::new(),
            ranker: MenuRanker::new(lexicon.clone()),
            selector: CategorySelector::new(lexicon.clone()),
            lexicon,
            suggestion_count: MENU_SUGGESTION_COUNT,
        }
    }

    /// Number of menus surfaced when the gate opens
    pub fn with_suggestion_count(mut self, count: usize) -> Self {
        self.suggestion_count = count.max(1);
        self
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn ranker(&self) -> &MenuRanker {
        &self.ranker
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    /// Run the pipeline on one utterance.
    ///
    /// Returns `None` and leaves the state untouched for empty or
    /// whitespace-only input.
    pub fn analyze(&self, state: &mut SessionState, text: &str) -> Option<TurnAnalysis> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring empty utterance");
            return None;
        }

        state.turn_count = state.turn_count.saturating_add(1);
        // per-turn fields
        state.category = None;
        state.suggested_menu = None;

        self.needs.update(&mut state.needs, text);
        self.sentiment.update(&mut state.sentiment, text);
        let touched = self.completeness.update(&mut state.completeness, text);
        self.composite
            .update(&mut state.composite, &state.needs, &state.completeness, state.turn_count);

        let (score, status) = self.gate.evaluate(state);
        state.timing_score = score;

        debug!(
            turn = state.turn_count,
            timing = score,
            status = %status,
            topics = touched.len(),
            "utterance analysed"
        );

        let suggestions = self.suggestions(state);
        Some(TurnAnalysis::new(state.clone(), suggestions))
    }

    /// Menus to show for the current state.
    ///
    /// The top N once the gate is ready; before that, the remote pick if any.
    pub fn suggestions(&self, state: &SessionState) -> Vec<RankedMenu> {
        if TimingStatus::from_score(state.timing_score).is_ready() {
            return self.ranker.top(&state.composite, self.suggestion_count);
        }
        state
            .suggested_menu
            .as_deref()
            .and_then(|pick| self.remote_pick(pick, &state.composite))
            .into_iter()
            .collect()
    }

    /// Unknown picks keep their raw name and run as the first menu of the table
    fn remote_pick(&self, pick: &str, composite: &CompositeIndex) -> Option<RankedMenu> {
        if let Some(menu) = self.ranker.resolve(pick) {
            return Some(self.ranker.ranked_entry(menu, composite));
        }
        let fallback = self.lexicon.config().menus.first()?;
        Some(RankedMenu {
            title: pick.to_string(),
            ..self.ranker.ranked_entry(fallback, composite)
        })
    }

    /// Apply the optional fields of a remote answer. Values are clamped,
    /// unknown keys ignored.
    pub fn apply_remote(&self, state: &mut SessionState, response: &ChatTurnResponse) {
        let mut next = state.clone();

        if let Some(needs) = &response.needs_analysis {
            for (name, value) in needs {
                match NeedKind::parse(name) {
                    Some(kind) => next.needs.set(kind, *value),
                    None => debug!(key = %name, "ignoring unknown need"),
                }
            }
        }

        if let Some(emotion) = &response.emotion_analysis {
            if let Some(polarity) = emotion.polarity {
                next.sentiment.polarity = clamp_score(polarity, -1.0, 1.0);
            }
            if let Some(intensity) = emotion.intensity {
                next.sentiment.intensity = clamp_score(intensity, 0.0, 1.0);
            }
            if let Some(label) = emotion.dominant.as_deref().and_then(SentimentLabel::parse) {
                next.sentiment.dominant = label;
            }
        }

        if let Some(scores) = &response.resort_scores {
            for (name, value) in scores {
                if let Some(factor) = CompositeFactor::parse(name) {
                    next.composite.set(factor, *value);
                }
            }
        }

        if let Some(label) = response.category.as_deref() {
            next.category = Some(self.selector.by_label(label));
        }

        let pick = response
            .suggested_fortune
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(pick) = pick {
            next.suggested_menu = Some(match self.ranker.resolve(pick) {
                Some(menu) => menu.id.clone(),
                None => {
                    debug!(pick = %pick, "remote suggested an unknown menu");
                    pick.to_string()
                }
            });
        }

        // a remote timing score wins; otherwise the gate reads the updated scores
        next.timing_score = match response.fortune_timing_score {
            Some(timing) => clamp_score(timing.round(), 0.0, 100.0) as u32,
            None => self.gate.evaluate(&next).0,
        };

        *state = next;
    }

    /// Deterministic local reply: category from needs, template by turn
    pub fn fallback_reply(&self, state: &mut SessionState) -> (String, SelectedCategory) {
        let category = self.selector.select(&state.needs);
        let reply = self.selector.canned_reply(category.id, state.turn_count);
        state.category = Some(category.clone());
        (reply, category)
    }

    /// Canned reply for an already chosen category
    pub fn canned_reply(&self, category_id: u32, turn: u32) -> String {
        self.selector.canned_reply(category_id, turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::types::{DataCategory, RemoteSentiment};

    fn engine() -> AnalysisEngine {
        AnalysisEngine::default()
    }

    #[test]
    fn test_empty_utterance_is_noop() {
        let mut state = SessionState::new();
        assert!(engine().analyze(&mut state, "   \n").is_none());
        assert_eq!(state, SessionState::new());
    }

    #[test]
    fn test_unrecognised_utterance() {
        let e = engine();
        let mut state = SessionState::new();
        e.analyze(&mut state, "仕事でミスして落ち込んでいます").unwrap();
        let before = state.clone();

        let analysis = e.analyze(&mut state, "xyz").unwrap();
        assert_eq!(analysis.turn, before.turn_count + 1);
        for kind in NeedKind::ALL {
            assert!((state.needs.get(kind) - before.needs.get(kind) / 2.0).abs() < 1e-9);
        }
        assert_eq!(state.sentiment.polarity, 0.0);
        assert_eq!(state.sentiment.dominant, SentimentLabel::Neutral);
        for cat in DataCategory::ALL {
            let expected = if cat == DataCategory::PsychologyEmotion {
                (before.completeness.get(cat) + 10.0).min(100.0)
            } else {
                before.completeness.get(cat)
            };
            assert_eq!(state.completeness.get(cat), expected);
        }
    }

    #[test]
    fn test_first_turn_numbers() {
        let mut state = SessionState::new();
        let analysis = engine().analyze(&mut state, "仕事の話").unwrap();
        assert_eq!(state.turn_count, 1);
        assert_eq!(state.completeness.work_career, 20.0);
        // occupation 4, time 2, intelligence 1.2 → 7.2 / 7 → 1
        assert_eq!(state.composite.total(), 1.0);
        assert_eq!(analysis.status, TimingStatus::NotReady);
        assert!(analysis.suggestions.is_empty());
    }

    #[test]
    fn test_bounds_under_adversarial_input() {
        let e = engine();
        let mut state = SessionState::new();
        let noisy = "疲れた".repeat(500)
            + &"寂しい一人孤独".repeat(200)
            + "嬉しい楽しい幸せ良い素晴らしい最高30歳仕事恋人占い";
        for _ in 0..200 {
            e.analyze(&mut state, &noisy).unwrap();
        }
        for kind in NeedKind::ALL {
            let v = state.needs.get(kind);
            assert!((0.0..=100.0).contains(&v), "{} = {}", kind, v);
        }
        for factor in CompositeFactor::ALL {
            let v = state.composite.get(factor);
            assert!((0.0..=100.0).contains(&v));
        }
        assert!((-1.0..=1.0).contains(&state.sentiment.polarity));
        assert!((0.0..=1.0).contains(&state.sentiment.intensity));
        assert!(state.completeness.total() <= 100.0);
        assert!(state.timing_score <= 100);
        assert_eq!(state.turn_count, 200);
    }

    #[test]
    fn test_gate_opens_with_three_suggestions() {
        let e = engine();
        let mut state = SessionState::new();
        let mut last = None;
        for _ in 0..40 {
            last = e.analyze(&mut state, "30歳、会社の仕事がつらい。一人で寂しい、孤独。好きな人と恋人になりたい、占いと運命を信じる");
        }
        let analysis = last.unwrap();
        assert!(analysis.status.is_ready());
        assert_eq!(analysis.suggestions.len(), MENU_SUGGESTION_COUNT);
    }

    #[test]
    fn test_apply_remote_partial() {
        let e = engine();
        let mut state = SessionState::new();
        e.analyze(&mut state, "仕事の話").unwrap();
        let before = state.clone();

        let response = ChatTurnResponse {
            resort_scores: Some(HashMap::from([
                ("romance".to_string(), 140.0),
                ("total".to_string(), 3.0),
            ])),
            needs_analysis: Some(HashMap::from([("loneliness".to_string(), 55.0)])),
            emotion_analysis: Some(RemoteSentiment {
                polarity: Some(-3.0),
                intensity: None,
                dominant: Some("ネガティブ".into()),
            }),
            fortune_timing_score: Some(71.6),
            category: Some("寄り添い".into()),
            suggested_fortune: Some("恋愛相性診断".into()),
            response: Some("reply".into()),
        };
        e.apply_remote(&mut state, &response);

        assert_eq!(state.composite.romance, 100.0);
        assert_eq!(state.composite.time, before.composite.time);
        assert_eq!(state.needs.loneliness, 55.0);
        assert_eq!(state.needs.encouragement, before.needs.encouragement);
        assert_eq!(state.sentiment.polarity, -1.0);
        assert_eq!(state.sentiment.intensity, before.sentiment.intensity);
        assert_eq!(state.sentiment.dominant, SentimentLabel::Negative);
        assert_eq!(state.timing_score, 72);
        assert_eq!(state.category.as_ref().map(|c| c.id), Some(4));
        assert_eq!(state.suggested_menu.as_deref(), Some("love_compatibility"));

        // gate is open: the ranked top N replace the remote pick
        let picks = e.suggestions(&state);
        assert_eq!(picks.len(), MENU_SUGGESTION_COUNT);
    }

    #[test]
    fn test_apply_remote_recomputes_timing() {
        let e = engine();
        let mut state = SessionState::new();
        e.analyze(&mut state, "仕事の話").unwrap();
        assert_eq!(state.timing_score, 2);

        let scores = CompositeFactor::ALL
            .iter()
            .map(|f| (f.as_str().to_string(), 100.0))
            .collect();
        let response = ChatTurnResponse {
            resort_scores: Some(scores),
            needs_analysis: Some(HashMap::from([("loneliness".to_string(), 100.0)])),
            ..Default::default()
        };
        e.apply_remote(&mut state, &response);

        // 100 * 0.4 + 6 * 0.3 + 100 * 0.3 = 71.8
        assert_eq!(state.timing_score, 72);
        assert_eq!(state.timing_score, e.gate.evaluate(&state).0);
        assert_eq!(e.suggestions(&state).len(), MENU_SUGGESTION_COUNT);
    }

    #[test]
    fn test_remote_pick_before_gate_opens() {
        let e = engine();
        let mut state = SessionState::new();
        e.analyze(&mut state, "好きな人がいる").unwrap();

        let response = ChatTurnResponse {
            suggested_fortune: Some("恋愛相性診断".into()),
            ..Default::default()
        };
        e.apply_remote(&mut state, &response);

        assert!(!TimingStatus::from_score(state.timing_score).is_ready());
        let picks = e.suggestions(&state);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, "love_compatibility");
    }

    #[test]
    fn test_unknown_remote_pick_keeps_raw_name() {
        let e = engine();
        let mut state = SessionState::new();
        e.analyze(&mut state, "好きな人がいる").unwrap();

        let response = ChatTurnResponse {
            suggested_fortune: Some("復縁可能性診断".into()),
            ..Default::default()
        };
        e.apply_remote(&mut state, &response);

        assert_eq!(state.suggested_menu.as_deref(), Some("復縁可能性診断"));
        let picks = e.suggestions(&state);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].title, "復縁可能性診断");
        assert_eq!(picks[0].id, "honesty_reading");
    }

    #[test]
    fn test_fallback_reply_is_deterministic() {
        let e = engine();
        let mut a = SessionState::new();
        let mut b = SessionState::new();
        e.analyze(&mut a, "一人で寂しい").unwrap();
        e.analyze(&mut b, "一人で寂しい").unwrap();
        let (ra, ca) = e.fallback_reply(&mut a);
        let (rb, cb) = e.fallback_reply(&mut b);
        assert_eq!(ra, rb);
        assert_eq!(ca, cb);
        assert_eq!(a.category, Some(ca));
    }
}
