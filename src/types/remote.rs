//! Request/response shapes of the remote chat + fortune backend

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ChatTurn, SessionState};

/// POST /api/chat body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
    pub user_data: SessionState,
    pub chat_history: Vec<ChatTurn>,
    pub rally_count: u32,
}

/// Remote sentiment; any subset of fields may be present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteSentiment {
    pub polarity: Option<f64>,
    pub intensity: Option<f64>,
    /// Free-form label, mapped through `SentimentLabel::parse`
    #[serde(alias = "dominant_emotion")]
    pub dominant: Option<String>,
}

/// POST /api/chat response. Every field is optional and applied independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    /// Reply text
    pub response: Option<String>,
    /// Reply category label
    pub category: Option<String>,
    /// need name → score
    pub needs_analysis: Option<HashMap<String, f64>>,
    pub emotion_analysis: Option<RemoteSentiment>,
    /// composite factor name → score (partial allowed)
    pub resort_scores: Option<HashMap<String, f64>>,
    pub fortune_timing_score: Option<f64>,
    /// Menu id or menu title
    pub suggested_fortune: Option<String>,
}

/// POST /api/fortune body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FortuneRequest {
    pub fortune_type: String,
    pub user_data: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_context: Option<String>,
}

/// POST /api/fortune response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FortuneResponse {
    pub fortune_result: String,
}
