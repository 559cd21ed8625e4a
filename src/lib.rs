//! RESORT-TI: need, sentiment and timing analysis for a fortune chat
//!
//! Pipeline per utterance:
//! needs → sentiment → completeness → composite → timing gate → menu ranking

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// NEED DETECTOR
// =============================================================================

/// Base score contributed by one keyword hit, before the need weight
pub const NEED_HIT_BASE: f64 = 20.0;

/// Smoothing factor: new = old * (1 - a) + raw * a
pub const NEED_SMOOTHING: f64 = 0.5;

// =============================================================================
// SENTIMENT ESTIMATOR
// =============================================================================

/// Polarity shift per polarity-word hit
pub const SENTIMENT_POLARITY_STEP: f64 = 0.3;

/// Intensity gain per polarity-word hit (either direction)
pub const SENTIMENT_INTENSITY_STEP: f64 = 0.2;

/// |polarity| must exceed this for a non-neutral label
pub const SENTIMENT_LABEL_THRESHOLD: f64 = 0.5;

// =============================================================================
// COMPOSITE INDEX (RESORT-TI) WEIGHTS
// =============================================================================

pub const COMPOSITE_RELATIONSHIP_WEIGHT: f64 = 0.1;
pub const COMPOSITE_EMOTION_WEIGHT: f64 = 0.05;
pub const COMPOSITE_SPIRIT_WEIGHT: f64 = 0.3;
pub const COMPOSITE_OCCUPATION_WEIGHT: f64 = 0.2;
pub const COMPOSITE_ROMANCE_WEIGHT: f64 = 0.3;
/// Added per elapsed turn, so long conversations saturate `time`
pub const COMPOSITE_TIME_PER_TURN: f64 = 2.0;
pub const COMPOSITE_INTELLIGENCE_WEIGHT: f64 = 0.2;

// =============================================================================
// TIMING GATE
// =============================================================================

pub const TIMING_WEIGHT_COMPOSITE: f64 = 0.4;
pub const TIMING_WEIGHT_COMPLETENESS: f64 = 0.3;
pub const TIMING_WEIGHT_NEED: f64 = 0.3;

/// timing_score at or above this → propose menus
pub const TIMING_THRESHOLD_READY: u32 = 70;

/// timing_score at or above this → approaching
pub const TIMING_THRESHOLD_APPROACHING: u32 = 50;

// =============================================================================
// MENU RANKER
// =============================================================================

/// Every menu starts from this match score
pub const MENU_BASE_SCORE: f64 = 50.0;

/// Menus shown when the gate opens
pub const MENU_SUGGESTION_COUNT: usize = 3;

// =============================================================================
// SESSION
// =============================================================================

/// Recent turns sent to the remote backend
pub const HISTORY_WINDOW_TURNS: usize = 5;

/// Event log keeps only the most recent entries
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Remote backend timeout (seconds)
pub const REMOTE_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

/// Clamp into [lo, hi]; NaN collapses to `lo`
pub fn clamp_score(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}
