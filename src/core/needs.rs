//! Need Detector: weighted keyword counting + exponential smoothing
//!
//! new = clamp(0, 100, (old + Σ weight × 20) / 2)
//!
//! Needs without hits decay toward 0 by half every turn.

use std::sync::Arc;

use crate::{NEED_HIT_BASE, NEED_SMOOTHING};
use crate::core::Lexicon;
use crate::types::{NeedKind, NeedScores};

#[derive(Debug, Clone)]
pub struct NeedDetector {
    lexicon: Arc<Lexicon>,
}

impl Default for NeedDetector {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl NeedDetector {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Unsmoothed contribution of `text` to one need
    pub fn raw_delta(&self, kind: NeedKind, text: &str) -> f64 {
        self.lexicon
            .needs()
            .iter()
            .filter(|m| m.need == kind)
            .map(|m| m.keywords.hits(text) as f64 * m.weight * NEED_HIT_BASE)
            .sum()
    }

    /// Smooth every need toward this utterance's raw scores
    pub fn update(&self, needs: &mut NeedScores, text: &str) {
        for kind in NeedKind::ALL {
            let old = needs.get(kind);
            let raw = self.raw_delta(kind, text);
            needs.set(kind, old * (1.0 - NEED_SMOOTHING) + raw * NEED_SMOOTHING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_without_hits() {
        let detector = NeedDetector::default();
        let mut needs = NeedScores::default();
        needs.set(NeedKind::Loneliness, 40.0);
        detector.update(&mut needs, "今日は晴れ");
        assert!((needs.loneliness - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_hit_from_zero() {
        let detector = NeedDetector::default();
        let mut needs = NeedScores::default();
        // encouragement weight 0.9 → raw 18 → (0 + 18) / 2
        detector.update(&mut needs, "不安です");
        assert!((needs.encouragement - 9.0).abs() < 1e-9);
        assert_eq!(needs.loneliness, 0.0);
    }

    #[test]
    fn test_multiple_keywords_accumulate() {
        let detector = NeedDetector::default();
        // loneliness weight 0.8: 一人 + 寂しい + 孤独 → 3 × 16 = 48
        let raw = detector.raw_delta(NeedKind::Loneliness, "一人で寂しい、孤独だ");
        assert!((raw - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_repetition_cannot_overflow() {
        let detector = NeedDetector::default();
        let mut needs = NeedScores::default();
        let text = "一人 寂しい 孤独 理解者がいない 話し相手 味方がいない ".repeat(50);
        for _ in 0..20 {
            detector.update(&mut needs, &text);
        }
        assert!(needs.loneliness <= 100.0);
        assert!(needs.loneliness > 90.0);
    }
}
