//! Chat session: one conversation's state, history and log, plus the
//! local-first / remote-second turn flow.
//!
//! Per message:
//! 1. local pipeline runs and is committed
//! 2. remote backend is asked; its fields are applied on success
//! 3. otherwise a deterministic canned reply is produced
//! 4. history and event log are updated, the log persisted and shipped
//!    to the backend best-effort

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::core::{AnalysisEngine, ChatBackend, EventLog};
use crate::error::{EngineError, RemoteError, Result};
use crate::types::{
    ChatReply, ChatTurn, ChatTurnRequest, FortuneRequest, FortuneResult, HistoryWindow, LogEntry,
    LogEventType, RankedMenu, ReplySource, SessionState, TurnAnalysis,
};

pub struct ChatSession {
    id: String,
    state: SessionState,
    history: HistoryWindow,
    log: EventLog,
    engine: Arc<AnalysisEngine>,
    backend: Arc<dyn ChatBackend>,
    log_path: Option<PathBuf>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("turn_count", &self.state.turn_count)
            .field("backend", &self.backend.name())
            .field("log_len", &self.log.len())
            .finish()
    }
}

impl ChatSession {
    pub fn new(engine: Arc<AnalysisEngine>, backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_id(generate_session_id(), engine, backend)
    }

    pub fn with_id(
        id: impl Into<String>,
        engine: Arc<AnalysisEngine>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            id: id.into(),
            state: SessionState::new(),
            history: HistoryWindow::new(),
            log: EventLog::new(),
            engine,
            backend,
            log_path: None,
        }
    }

    /// Persist the event log to `path` after every event
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryWindow {
        &self.history
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Current snapshot with status and suggestions
    pub fn analysis(&self) -> TurnAnalysis {
        TurnAnalysis::new(self.state.clone(), self.engine.suggestions(&self.state))
    }

    /// Every menu ranked against the current composite index
    pub fn ranked_menus(&self) -> Vec<RankedMenu> {
        self.engine.ranker().rank(&self.state.composite)
    }

    pub fn export_log(&self) -> Result<String> {
        self.log.export_json()
    }

    /// Handle one user message end to end
    pub async fn handle_message(&mut self, text: &str) -> Result<ChatReply> {
        let text = text.trim();
        let local = self
            .engine
            .analyze(&mut self.state, text)
            .ok_or(EngineError::EmptyUtterance)?;
        debug!(
            session = %self.id,
            turn = local.turn,
            timing = local.timing_score,
            "local analysis committed"
        );
        self.record(
            LogEventType::UserAction,
            json!({ "action": "send_message", "message": text }),
        );

        let request = ChatTurnRequest {
            message: text.to_string(),
            user_data: self.state.clone(),
            chat_history: self.history.to_vec(),
            rally_count: self.state.turn_count,
        };

        let (reply, source) = match self.backend.chat(&request).await {
            Ok(response) => {
                self.engine.apply_remote(&mut self.state, &response);
                let remote_text = response
                    .response
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty());
                match remote_text {
                    Some(reply) => (reply.to_string(), ReplySource::F100_REMOTE),
                    None => (self.canned_reply(), ReplySource::F101_REMOTE_EMPTY),
                }
            }
            Err(err) => {
                self.remote_failed("chat", &err);
                let (reply, _) = self.engine.fallback_reply(&mut self.state);
                (reply, ReplySource::from_remote_error(&err))
            }
        };

        let analysis = self.analysis();
        self.history
            .push(ChatTurn::new(self.state.turn_count, text, reply.as_str()));
        self.record(
            LogEventType::ChatMessage,
            json!({
                "user_message": text,
                "bot_response": reply,
                "source": source.code(),
                "category": self.state.category,
                "suggestions": analysis.suggestions.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            }),
        );

        info!(
            session = %self.id,
            turn = analysis.turn,
            timing = analysis.timing_score,
            status = %analysis.status,
            source = source.code(),
            "turn complete"
        );

        Ok(ChatReply {
            reply,
            source,
            category: self.state.category.clone(),
            analysis,
        })
    }

    /// Detailed reading for a menu, by id or title
    pub async fn fortune(&mut self, menu: &str) -> Result<FortuneResult> {
        let engine = self.engine.clone();
        let key = menu.trim();
        let menu_def = engine.ranker().resolve(key);
        let menu_id = menu_def.map(|m| m.id.clone()).unwrap_or_else(|| key.to_string());
        let static_content = engine.lexicon().config().fortune(&menu_id);

        if menu_def.is_none() && static_content.is_none() {
            return Err(EngineError::UnknownMenu(key.to_string()));
        }

        self.record(
            LogEventType::UserAction,
            json!({ "action": "select_fortune", "menu_id": menu_id }),
        );

        let request = FortuneRequest {
            fortune_type: menu_id.clone(),
            user_data: self.state.clone(),
            specific_context: self.history.last().map(|t| t.user_message.clone()),
        };

        let result = match self.backend.fortune(&request).await {
            Ok(response) => FortuneResult {
                menu_id: menu_id.clone(),
                title: static_content
                    .map(|c| c.title.clone())
                    .or_else(|| menu_def.map(|m| m.title.clone()))
                    .unwrap_or_else(|| menu_id.clone()),
                content: response.fortune_result,
                key_points: Vec::new(),
                advice: String::new(),
                remote: true,
            },
            Err(err) => {
                self.remote_failed("fortune", &err);
                match (static_content, menu_def) {
                    (Some(content), _) => FortuneResult::from_static(content),
                    (None, Some(def)) => FortuneResult {
                        menu_id: menu_id.clone(),
                        title: def.title.clone(),
                        content: def.description.clone(),
                        key_points: Vec::new(),
                        advice: String::new(),
                        remote: false,
                    },
                    (None, None) => return Err(EngineError::UnknownMenu(key.to_string())),
                }
            }
        };

        self.record(
            LogEventType::Fortune,
            json!({ "menu_id": result.menu_id, "title": result.title, "remote": result.remote }),
        );
        Ok(result)
    }

    fn canned_reply(&mut self) -> String {
        match &self.state.category {
            Some(category) => self.engine.canned_reply(category.id, self.state.turn_count),
            None => self.engine.fallback_reply(&mut self.state).0,
        }
    }

    fn remote_failed(&mut self, call: &str, err: &RemoteError) {
        match err {
            RemoteError::Disabled => debug!(session = %self.id, call, "offline, using local reply"),
            _ => warn!(session = %self.id, call, error = %err, "remote backend failed, using local reply"),
        }
        self.record(
            LogEventType::Error,
            json!({ "call": call, "error": err.to_string() }),
        );
    }

    fn record(&mut self, event_type: LogEventType, data: serde_json::Value) {
        let entry = LogEntry::new(event_type, data, &self.state, self.id.as_str());
        self.log.push(entry.clone());
        if let Some(path) = &self.log_path {
            if let Err(e) = self.log.save(path) {
                warn!(path = %path.display(), error = %e, "event log not saved");
            }
        }
        self.ship(entry);
    }

    /// Fire-and-forget upload of one entry
    fn ship(&self, entry: LogEntry) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => return,
        };
        let backend = self.backend.clone();
        let session = self.id.clone();
        runtime.spawn(async move {
            match backend.log(&entry).await {
                Ok(()) | Err(RemoteError::Disabled) => {}
                Err(e) => debug!(session = %session, error = %e, "log entry not shipped"),
            }
        });
    }
}

/// Generate session ID
pub fn generate_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("session_{:x}", nanos as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OfflineBackend;

    fn offline_session() -> ChatSession {
        ChatSession::with_id("s1", Arc::new(AnalysisEngine::default()), Arc::new(OfflineBackend))
    }

    #[tokio::test]
    async fn test_offline_turn_uses_canned_reply() {
        let mut session = offline_session();
        let reply = session.handle_message("一人で寂しい").await.unwrap();
        assert_eq!(reply.source, ReplySource::F200_FALLBACK_OFFLINE);
        assert_eq!(reply.category.as_ref().map(|c| c.id), Some(4));
        assert!(!reply.reply.is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.state().turn_count, 1);
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let mut session = offline_session();
        let err = session.handle_message("  ").await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyUtterance));
        assert_eq!(session.state(), &SessionState::new());
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_log_records_each_step() {
        let mut session = offline_session();
        session.handle_message("仕事がつらい").await.unwrap();
        let types: Vec<LogEventType> = session.log().entries().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![LogEventType::UserAction, LogEventType::Error, LogEventType::ChatMessage]
        );
    }

    #[tokio::test]
    async fn test_fortune_static_fallback() {
        let mut session = offline_session();
        let result = session.fortune("love_timing").await.unwrap();
        assert!(!result.remote);
        assert_eq!(result.menu_id, "love_timing");
        assert!(!result.key_points.is_empty());

        let by_title = session.fortune("恋愛相性診断").await.unwrap();
        assert_eq!(by_title.menu_id, "love_compatibility");
    }

    #[tokio::test]
    async fn test_fortune_unknown_menu() {
        let mut session = offline_session();
        let err = session.fortune("tarot_deluxe").await.unwrap_err();
        assert!(matches!(err, EngineError::UnknownMenu(_)));
    }

    #[test]
    fn test_session_id_format() {
        assert!(generate_session_id().starts_with("session_"));
    }
}
