//! Timing Gate: single proposal-readiness score
//!
//! timing = round(composite_total × 0.4 + completeness_total × 0.3 + max_need × 0.3)
//!
//! Stateless: recomputed from the current SessionState every turn.

use crate::{clamp_score, TIMING_WEIGHT_COMPLETENESS, TIMING_WEIGHT_COMPOSITE, TIMING_WEIGHT_NEED};
use crate::types::{SessionState, TimingStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct TimingGate;

impl TimingGate {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, composite_total: f64, completeness_total: f64, max_need: f64) -> u32 {
        let raw = composite_total * TIMING_WEIGHT_COMPOSITE
            + completeness_total * TIMING_WEIGHT_COMPLETENESS
            + max_need * TIMING_WEIGHT_NEED;
        clamp_score(raw.round(), 0.0, 100.0) as u32
    }

    /// Score and status for the given state
    pub fn evaluate(&self, state: &SessionState) -> (u32, TimingStatus) {
        let score = self.score(
            state.composite.total(),
            state.completeness.total(),
            state.needs.max(),
        );
        (score, TimingStatus::from_score(score))
    }
}
