//! Session state: the single value every pipeline stage reads and mutates
//!
//! Totals are never stored. `Completeness::total` and `CompositeIndex::total`
//! are computed from the named keys on every call, and serialized snapshots
//! carry them as derived fields.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::clamp_score;
use crate::types::{CompositeFactor, DataCategory, NeedKind};

/// Need scores, each in [0, 100]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedScores {
    pub complaining_listening: f64,
    pub emotion_organizing: f64,
    pub recognition_desire: f64,
    pub encouragement: f64,
    pub loneliness: f64,
}

impl NeedScores {
    pub fn get(&self, kind: NeedKind) -> f64 {
        match kind {
            NeedKind::ComplainingListening => self.complaining_listening,
            NeedKind::EmotionOrganizing => self.emotion_organizing,
            NeedKind::RecognitionDesire => self.recognition_desire,
            NeedKind::Encouragement => self.encouragement,
            NeedKind::Loneliness => self.loneliness,
        }
    }

    /// Store a score, clamped to [0, 100]
    pub fn set(&mut self, kind: NeedKind, value: f64) {
        let slot = match kind {
            NeedKind::ComplainingListening => &mut self.complaining_listening,
            NeedKind::EmotionOrganizing => &mut self.emotion_organizing,
            NeedKind::RecognitionDesire => &mut self.recognition_desire,
            NeedKind::Encouragement => &mut self.encouragement,
            NeedKind::Loneliness => &mut self.loneliness,
        };
        *slot = clamp_score(value, 0.0, 100.0);
    }

    /// Highest need score (0 when all are zero)
    pub fn max(&self) -> f64 {
        NeedKind::ALL
            .iter()
            .map(|k| self.get(*k))
            .fold(0.0, f64::max)
    }

    /// Need with the highest score; first in `NeedKind::ALL` wins ties
    pub fn dominant(&self) -> Option<NeedKind> {
        let mut best: Option<(NeedKind, f64)> = None;
        for kind in NeedKind::ALL {
            let score = self.get(kind);
            if score > best.map(|(_, s)| s).unwrap_or(0.0) {
                best = Some((kind, score));
            }
        }
        best.map(|(k, _)| k)
    }
}

/// Dominant sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// No utterance analysed yet
    #[default]
    Unset,
}

impl SentimentLabel {
    /// Lenient label parsing for remote payloads (English or Japanese)
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" | "ポジティブ" => Some(SentimentLabel::Positive),
            "negative" | "ネガティブ" => Some(SentimentLabel::Negative),
            "neutral" | "ニュートラル" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Unset => "unset",
        };
        write!(f, "{}", name)
    }
}

/// Coarse sentiment of the latest utterance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentiment {
    /// -1.0 (negative) ..= 1.0 (positive)
    pub polarity: f64,
    /// 0.0 ..= 1.0
    pub intensity: f64,
    #[serde(alias = "dominant_emotion")]
    pub dominant: SentimentLabel,
}

/// Data completeness per category, each in [0, 100]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Completeness {
    pub basic_info: f64,
    pub psychology_emotion: f64,
    pub love_relationships: f64,
    pub work_career: f64,
    pub spiritual_values: f64,
}

impl Completeness {
    pub fn get(&self, category: DataCategory) -> f64 {
        match category {
            DataCategory::BasicInfo => self.basic_info,
            DataCategory::PsychologyEmotion => self.psychology_emotion,
            DataCategory::LoveRelationships => self.love_relationships,
            DataCategory::WorkCareer => self.work_career,
            DataCategory::SpiritualValues => self.spiritual_values,
        }
    }

    /// Add-then-clamp to [0, 100]
    pub fn add(&mut self, category: DataCategory, delta: f64) {
        let slot = match category {
            DataCategory::BasicInfo => &mut self.basic_info,
            DataCategory::PsychologyEmotion => &mut self.psychology_emotion,
            DataCategory::LoveRelationships => &mut self.love_relationships,
            DataCategory::WorkCareer => &mut self.work_career,
            DataCategory::SpiritualValues => &mut self.spiritual_values,
        };
        *slot = clamp_score(*slot + delta, 0.0, 100.0);
    }

    /// Mean of the five categories
    pub fn total(&self) -> f64 {
        let sum: f64 = DataCategory::ALL.iter().map(|c| self.get(*c)).sum();
        sum / DataCategory::ALL.len() as f64
    }
}

impl Serialize for Completeness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Completeness", 6)?;
        for category in DataCategory::ALL {
            s.serialize_field(category.as_str(), &self.get(category))?;
        }
        s.serialize_field("total", &self.total())?;
        s.end()
    }
}

/// RESORT-TI composite factors, each in [0, 100]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompositeIndex {
    pub relationship: f64,
    pub emotion: f64,
    pub spirit: f64,
    pub occupation: f64,
    pub romance: f64,
    pub time: f64,
    pub intelligence: f64,
}

impl CompositeIndex {
    pub fn get(&self, factor: CompositeFactor) -> f64 {
        match factor {
            CompositeFactor::Relationship => self.relationship,
            CompositeFactor::Emotion => self.emotion,
            CompositeFactor::Spirit => self.spirit,
            CompositeFactor::Occupation => self.occupation,
            CompositeFactor::Romance => self.romance,
            CompositeFactor::Time => self.time,
            CompositeFactor::Intelligence => self.intelligence,
        }
    }

    fn slot(&mut self, factor: CompositeFactor) -> &mut f64 {
        match factor {
            CompositeFactor::Relationship => &mut self.relationship,
            CompositeFactor::Emotion => &mut self.emotion,
            CompositeFactor::Spirit => &mut self.spirit,
            CompositeFactor::Occupation => &mut self.occupation,
            CompositeFactor::Romance => &mut self.romance,
            CompositeFactor::Time => &mut self.time,
            CompositeFactor::Intelligence => &mut self.intelligence,
        }
    }

    /// Add-then-clamp to [0, 100]
    pub fn add(&mut self, factor: CompositeFactor, delta: f64) {
        let slot = self.slot(factor);
        *slot = clamp_score(*slot + delta, 0.0, 100.0);
    }

    /// Overwrite, clamped to [0, 100]
    pub fn set(&mut self, factor: CompositeFactor, value: f64) {
        *self.slot(factor) = clamp_score(value, 0.0, 100.0);
    }

    /// Mean of the seven factors, rounded to the nearest integer
    pub fn total(&self) -> f64 {
        let sum: f64 = CompositeFactor::ALL.iter().map(|f| self.get(*f)).sum();
        (sum / CompositeFactor::ALL.len() as f64).round()
    }
}

impl Serialize for CompositeIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CompositeIndex", 8)?;
        for factor in CompositeFactor::ALL {
            s.serialize_field(factor.as_str(), &self.get(factor))?;
        }
        s.serialize_field("total", &self.total())?;
        s.end()
    }
}

/// Reply category picked for the latest turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedCategory {
    pub id: u32,
    pub label: String,
    pub score: f64,
}

/// Everything the engine knows about one conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Accepted utterances so far (the "rally count")
    pub turn_count: u32,
    pub needs: NeedScores,
    pub sentiment: Sentiment,
    pub completeness: Completeness,
    pub composite: CompositeIndex,
    /// 0 ..= 100, recomputed every turn
    pub timing_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<SelectedCategory>,
    /// Menu id last suggested by the remote backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_menu: Option<String>,
}

impl SessionState {
    /// Fresh session: all scores zero, sentiment unset
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
