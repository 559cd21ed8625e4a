//! Completeness Tracker: topical keywords gate additive, clamped increments

use std::sync::Arc;

use crate::core::Lexicon;
use crate::types::{Completeness, DataCategory};

#[derive(Debug, Clone)]
pub struct CompletenessTracker {
    lexicon: Arc<Lexicon>,
}

impl Default for CompletenessTracker {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl CompletenessTracker {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Apply every rule that fires for `text`; returns the touched categories
    pub fn update(&self, completeness: &mut Completeness, text: &str) -> Vec<DataCategory> {
        let mut touched = Vec::new();
        for topic in self.lexicon.topics() {
            let fires = match &topic.keywords {
                Some(keywords) => keywords.any(text),
                None => true,
            };
            if fires {
                completeness.add(topic.category, topic.increment);
                touched.push(topic.category);
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_keyword_only() {
        let tracker = CompletenessTracker::default();
        let mut c = Completeness::default();
        let touched = tracker.update(&mut c, "仕事の話");
        assert_eq!(c.work_career, 20.0);
        assert_eq!(c.psychology_emotion, 10.0);
        assert_eq!(c.basic_info, 0.0);
        assert_eq!(c.love_relationships, 0.0);
        assert_eq!(c.spiritual_values, 0.0);
        assert_eq!(touched, vec![DataCategory::WorkCareer, DataCategory::PsychologyEmotion]);
    }

    #[test]
    fn test_group_fires_once_per_turn() {
        let tracker = CompletenessTracker::default();
        let mut c = Completeness::default();
        // both work keywords present, still a single +20
        tracker.update(&mut c, "仕事と会社");
        assert_eq!(c.work_career, 20.0);
    }

    #[test]
    fn test_every_group() {
        let tracker = CompletenessTracker::default();
        let mut c = Completeness::default();
        tracker.update(&mut c, "30歳、会社員、好きな人がいて、占いが好き");
        assert_eq!(c.basic_info, 15.0);
        assert_eq!(c.work_career, 20.0);
        assert_eq!(c.love_relationships, 25.0);
        assert_eq!(c.spiritual_values, 20.0);
        assert_eq!(c.psychology_emotion, 10.0);
        assert!((c.total() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_saturates_at_100() {
        let tracker = CompletenessTracker::default();
        let mut c = Completeness::default();
        for _ in 0..10 {
            tracker.update(&mut c, "彼のこと");
        }
        assert_eq!(c.love_relationships, 100.0);
        assert_eq!(c.psychology_emotion, 100.0);
        assert!(c.total() <= 100.0);
    }
}
