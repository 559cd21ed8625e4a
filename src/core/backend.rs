//! Remote chat backend
//!
//! POST {base}/api/chat     ChatTurnRequest  → ChatTurnResponse
//! POST {base}/api/fortune  FortuneRequest   → FortuneResponse
//! POST {base}/api/log      LogEntry         → ignored body
//!
//! Any failure is reported as `RemoteError`; callers fall back locally.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::RemoteError;
use crate::types::{
    ChatTurnRequest, ChatTurnResponse, FortuneRequest, FortuneResponse, LogEntry,
};
use crate::REMOTE_TIMEOUT_SECS;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnResponse, RemoteError>;

    async fn fortune(&self, request: &FortuneRequest) -> Result<FortuneResponse, RemoteError>;

    /// Ship one event log entry. Callers never fail a turn on this.
    async fn log(&self, entry: &LogEntry) -> Result<(), RemoteError>;
}

/// JSON-over-HTTP backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, Duration::from_secs(REMOTE_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<Response, RemoteError>
    where
        B: Serialize + Sync,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "remote request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, RemoteError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let text = self.post(path, body).await?.text().await?;
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnResponse, RemoteError> {
        self.post_json("/api/chat", request).await
    }

    async fn fortune(&self, request: &FortuneRequest) -> Result<FortuneResponse, RemoteError> {
        let response: FortuneResponse = self.post_json("/api/fortune", request).await?;
        if response.fortune_result.trim().is_empty() {
            return Err(RemoteError::Decode("empty fortune_result".to_string()));
        }
        Ok(response)
    }

    async fn log(&self, entry: &LogEntry) -> Result<(), RemoteError> {
        self.post("/api/log", entry).await.map(|_| ())
    }
}

/// No backend: every call fails with `Disabled`
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

#[async_trait]
impl ChatBackend for OfflineBackend {
    fn name(&self) -> &str {
        "offline"
    }

    async fn chat(&self, _request: &ChatTurnRequest) -> Result<ChatTurnResponse, RemoteError> {
        Err(RemoteError::Disabled)
    }

    async fn fortune(&self, _request: &FortuneRequest) -> Result<FortuneResponse, RemoteError> {
        Err(RemoteError::Disabled)
    }

    async fn log(&self, _entry: &LogEntry) -> Result<(), RemoteError> {
        Err(RemoteError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogEventType, SessionState};

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn test_offline_always_disabled() {
        let backend = OfflineBackend;
        let req = ChatTurnRequest {
            message: "こんにちは".into(),
            user_data: SessionState::new(),
            chat_history: Vec::new(),
            rally_count: 1,
        };
        assert!(matches!(backend.chat(&req).await, Err(RemoteError::Disabled)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // port 9 (discard) on loopback is expected to refuse connections
        let backend =
            HttpBackend::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let req = FortuneRequest {
            fortune_type: "love_timing".into(),
            user_data: SessionState::new(),
            specific_context: None,
        };
        assert!(matches!(
            backend.fortune(&req).await,
            Err(RemoteError::Transport(_))
        ));

        let entry = LogEntry::new(
            LogEventType::UserAction,
            serde_json::json!({ "action": "send_message" }),
            &SessionState::new(),
            "s1",
        );
        assert!(matches!(backend.log(&entry).await, Err(RemoteError::Transport(_))));
    }
}
