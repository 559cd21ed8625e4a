//! Sentiment Estimator: polarity word lists
//!
//! Each present positive entry: polarity +0.3, intensity +0.2
//! Each present negative entry: polarity -0.3, intensity +0.2
//!
//! The result overwrites the previous sentiment (no smoothing).

use std::sync::Arc;

use crate::{clamp_score, SENTIMENT_INTENSITY_STEP, SENTIMENT_LABEL_THRESHOLD, SENTIMENT_POLARITY_STEP};
use crate::core::Lexicon;
use crate::types::{Sentiment, SentimentLabel};

#[derive(Debug, Clone)]
pub struct SentimentEstimator {
    lexicon: Arc<Lexicon>,
}

impl Default for SentimentEstimator {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl SentimentEstimator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Estimate sentiment of a single utterance
    pub fn estimate(&self, text: &str) -> Sentiment {
        let positive = self.lexicon.positive().hits(text) as f64;
        let negative = self.lexicon.negative().hits(text) as f64;

        let polarity = (positive - negative) * SENTIMENT_POLARITY_STEP;
        let intensity = (positive + negative) * SENTIMENT_INTENSITY_STEP;

        let dominant = if polarity > SENTIMENT_LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < -SENTIMENT_LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };

        Sentiment {
            polarity: clamp_score(polarity, -1.0, 1.0),
            intensity: clamp_score(intensity, 0.0, 1.0),
            dominant,
        }
    }

    pub fn update(&self, sentiment: &mut Sentiment, text: &str) {
        *sentiment = self.estimate(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_without_hits() {
        let s = SentimentEstimator::default().estimate("今日は雨");
        assert_eq!(s.polarity, 0.0);
        assert_eq!(s.intensity, 0.0);
        assert_eq!(s.dominant, SentimentLabel::Neutral);
    }

    #[test]
    fn test_one_hit_stays_neutral() {
        let s = SentimentEstimator::default().estimate("嬉しい");
        assert!((s.polarity - 0.3).abs() < 1e-9);
        assert!((s.intensity - 0.2).abs() < 1e-9);
        assert_eq!(s.dominant, SentimentLabel::Neutral);
    }

    #[test]
    fn test_two_positive_hits_label_positive() {
        let s = SentimentEstimator::default().estimate("嬉しいし楽しい");
        assert_eq!(s.dominant, SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_and_repetition() {
        let s = SentimentEstimator::default().estimate("悲しい悲しい悲しい、最悪");
        // two distinct entries, repeats ignored
        assert!((s.polarity + 0.6).abs() < 1e-9);
        assert_eq!(s.dominant, SentimentLabel::Negative);
    }

    #[test]
    fn test_bounds_with_every_word() {
        let s = SentimentEstimator::default()
            .estimate("嬉しい楽しい幸せ良い素晴らしい最高 悲しい");
        assert_eq!(s.polarity, 1.0);
        assert_eq!(s.intensity, 1.0);
        assert_eq!(s.dominant, SentimentLabel::Positive);
    }

    #[test]
    fn test_update_overwrites() {
        let est = SentimentEstimator::default();
        let mut s = est.estimate("嬉しい楽しい幸せ");
        est.update(&mut s, "普通の日");
        assert_eq!(s.polarity, 0.0);
        assert_eq!(s.dominant, SentimentLabel::Neutral);
    }
}
