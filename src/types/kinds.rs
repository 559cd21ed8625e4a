//! Closed key sets for every score map

use serde::{Deserialize, Serialize};

/// The five conversational needs detected from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    /// Wants to vent / be listened to
    ComplainingListening,
    /// Wants help sorting out feelings
    EmotionOrganizing,
    /// Wants recognition or praise
    RecognitionDesire,
    /// Wants encouragement
    Encouragement,
    /// Feels alone
    Loneliness,
}

impl NeedKind {
    pub const ALL: [NeedKind; 5] = [
        NeedKind::ComplainingListening,
        NeedKind::EmotionOrganizing,
        NeedKind::RecognitionDesire,
        NeedKind::Encouragement,
        NeedKind::Loneliness,
    ];

    /// Look up by wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name.trim())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NeedKind::ComplainingListening => "complaining_listening",
            NeedKind::EmotionOrganizing => "emotion_organizing",
            NeedKind::RecognitionDesire => "recognition_desire",
            NeedKind::Encouragement => "encouragement",
            NeedKind::Loneliness => "loneliness",
        }
    }
}

/// Personal-data categories tracked for completeness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    BasicInfo,
    PsychologyEmotion,
    LoveRelationships,
    WorkCareer,
    SpiritualValues,
}

impl DataCategory {
    pub const ALL: [DataCategory; 5] = [
        DataCategory::BasicInfo,
        DataCategory::PsychologyEmotion,
        DataCategory::LoveRelationships,
        DataCategory::WorkCareer,
        DataCategory::SpiritualValues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::BasicInfo => "basic_info",
            DataCategory::PsychologyEmotion => "psychology_emotion",
            DataCategory::LoveRelationships => "love_relationships",
            DataCategory::WorkCareer => "work_career",
            DataCategory::SpiritualValues => "spiritual_values",
        }
    }
}

/// The seven RESORT-TI factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeFactor {
    Relationship,
    Emotion,
    Spirit,
    Occupation,
    Romance,
    Time,
    Intelligence,
}

impl CompositeFactor {
    pub const ALL: [CompositeFactor; 7] = [
        CompositeFactor::Relationship,
        CompositeFactor::Emotion,
        CompositeFactor::Spirit,
        CompositeFactor::Occupation,
        CompositeFactor::Romance,
        CompositeFactor::Time,
        CompositeFactor::Intelligence,
    ];

    /// Look up by wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name.trim())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeFactor::Relationship => "relationship",
            CompositeFactor::Emotion => "emotion",
            CompositeFactor::Spirit => "spirit",
            CompositeFactor::Occupation => "occupation",
            CompositeFactor::Romance => "romance",
            CompositeFactor::Time => "time",
            CompositeFactor::Intelligence => "intelligence",
        }
    }

    /// Single-letter tag used in compact displays (R E S O R T I)
    pub fn letter(&self) -> char {
        match self {
            CompositeFactor::Relationship => 'R',
            CompositeFactor::Emotion => 'E',
            CompositeFactor::Spirit => 'S',
            CompositeFactor::Occupation => 'O',
            CompositeFactor::Romance => 'R',
            CompositeFactor::Time => 'T',
            CompositeFactor::Intelligence => 'I',
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(NeedKind, DataCategory, CompositeFactor);
