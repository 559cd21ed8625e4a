//! RESORT-TI composite index
//!
//! Incremental add-then-clamp on seven factors:
//! - relationship += complaining_listening × 0.1
//! - emotion      += (encouragement + emotion_organizing) × 0.05
//! - spirit       += spiritual_values × 0.3
//! - occupation   += work_career × 0.2
//! - romance      += love_relationships × 0.3
//! - time         += turn_count × 2
//! - intelligence += completeness.total × 0.2

use crate::{
    COMPOSITE_EMOTION_WEIGHT, COMPOSITE_INTELLIGENCE_WEIGHT, COMPOSITE_OCCUPATION_WEIGHT,
    COMPOSITE_RELATIONSHIP_WEIGHT, COMPOSITE_ROMANCE_WEIGHT, COMPOSITE_SPIRIT_WEIGHT,
    COMPOSITE_TIME_PER_TURN,
};
use crate::types::{
    Completeness, CompositeFactor, CompositeIndex, DataCategory, NeedKind, NeedScores,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct CompositeCalculator;

impl CompositeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Per-factor increments for the current inputs
    pub fn deltas(
        &self,
        needs: &NeedScores,
        completeness: &Completeness,
        turn_count: u32,
    ) -> [(CompositeFactor, f64); 7] {
        [
            (
                CompositeFactor::Relationship,
                needs.get(NeedKind::ComplainingListening) * COMPOSITE_RELATIONSHIP_WEIGHT,
            ),
            (
                CompositeFactor::Emotion,
                (needs.get(NeedKind::Encouragement) + needs.get(NeedKind::EmotionOrganizing))
                    * COMPOSITE_EMOTION_WEIGHT,
            ),
            (
                CompositeFactor::Spirit,
                completeness.get(DataCategory::SpiritualValues) * COMPOSITE_SPIRIT_WEIGHT,
            ),
            (
                CompositeFactor::Occupation,
                completeness.get(DataCategory::WorkCareer) * COMPOSITE_OCCUPATION_WEIGHT,
            ),
            (
                CompositeFactor::Romance,
                completeness.get(DataCategory::LoveRelationships) * COMPOSITE_ROMANCE_WEIGHT,
            ),
            (CompositeFactor::Time, turn_count as f64 * COMPOSITE_TIME_PER_TURN),
            (
                CompositeFactor::Intelligence,
                completeness.total() * COMPOSITE_INTELLIGENCE_WEIGHT,
            ),
        ]
    }

    pub fn update(
        &self,
        index: &mut CompositeIndex,
        needs: &NeedScores,
        completeness: &Completeness,
        turn_count: u32,
    ) {
        for (factor, delta) in self.deltas(needs, completeness, turn_count) {
            index.add(factor, delta);
        }
    }
}
