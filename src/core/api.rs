//! HTTP + WebSocket API for RESORT-TI
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /session/new - Create new session
//! - GET /session/{id} - Snapshot, timing status and suggestions
//! - POST /session/{id}/message - Send a user message
//! - POST /session/{id}/fortune - Detailed reading for a menu
//! - GET /session/{id}/menus - Every menu ranked for the session
//! - GET /session/{id}/logs - Event log as a JSON array
//! - WS /ws/{id} - Live updates

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use crate::core::{generate_session_id, AnalysisEngine, ChatBackend, ChatSession};
use crate::error::EngineError;
use crate::types::{ChatReply, FortuneResult, RankedMenu, TurnAnalysis};

/// One live conversation plus its update channel
pub struct SessionEntry {
    pub session: Mutex<ChatSession>,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub session_id: String,
    pub turn_count: u32,
    pub timing_score: u32,
    pub status: String,
    pub resort_ti: f64,
    pub suggestions: Vec<String>,
    pub source: String,
}

impl SessionUpdate {
    fn from_reply(session_id: &str, reply: &ChatReply) -> Self {
        Self {
            session_id: session_id.to_string(),
            turn_count: reply.analysis.turn,
            timing_score: reply.analysis.timing_score,
            status: reply.analysis.status.to_string(),
            resort_ti: reply.analysis.snapshot.composite.total(),
            suggestions: reply.analysis.suggestions.iter().map(|m| m.id.clone()).collect(),
            source: reply.source.code().to_string(),
        }
    }
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
    pub engine: Arc<AnalysisEngine>,
    pub backend: Arc<dyn ChatBackend>,
    /// When set, each session persists its event log to `{dir}/{id}.json`
    pub log_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: Arc<AnalysisEngine>, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            backend,
            log_dir: None,
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    async fn entry(&self, id: &str) -> Result<Arc<SessionEntry>, StatusCode> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned().ok_or(StatusCode::NOT_FOUND)
    }
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub analysis: TurnAnalysis,
    pub history_len: usize,
    pub log_len: usize,
}

/// Send message request
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Fortune request
#[derive(Debug, Deserialize)]
pub struct FortuneSelectRequest {
    pub menu_id: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub sessions_active: usize,
}

fn status_for(err: &EngineError) -> StatusCode {
    match err {
        EngineError::EmptyUtterance => StatusCode::BAD_REQUEST,
        EngineError::UnknownMenu(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Create the API router
pub fn create_router(engine: Arc<AnalysisEngine>, backend: Arc<dyn ChatBackend>) -> Router {
    router_with_state(Arc::new(AppState::new(engine, backend)))
}

/// Router over a prepared state
pub fn router_with_state(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/message", post(send_message))
        .route("/session/:id/fortune", post(get_fortune))
        .route("/session/:id/menus", get(get_menus))
        .route("/session/:id/logs", get(get_logs))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        backend: state.backend.name().to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let mut sessions = state.sessions.write().await;
    let mut session_id = generate_session_id();
    while sessions.contains_key(&session_id) {
        session_id = format!("{}_{}", session_id, sessions.len());
    }

    let mut session =
        ChatSession::with_id(session_id.clone(), state.engine.clone(), state.backend.clone());
    if let Some(dir) = &state.log_dir {
        session = session.with_log_path(dir.join(format!("{}.json", session_id)));
    }
    let (tx, _) = broadcast::channel(100);

    sessions.insert(
        session_id.clone(),
        Arc::new(SessionEntry {
            session: Mutex::new(session),
            update_tx: tx,
        }),
    );
    info!(session = %session_id, "session created");

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let entry = state.entry(&id).await?;
    let session = entry.session.lock().await;

    Ok(Json(SessionStatusResponse {
        session_id: id,
        analysis: session.analysis(),
        history_len: session.history().len(),
        log_len: session.log().len(),
    }))
}

/// Send a user message
async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ChatReply>, StatusCode> {
    let entry = state.entry(&id).await?;
    let mut session = entry.session.lock().await;

    let reply = session.handle_message(&req.text).await.map_err(|e| {
        if !matches!(e, EngineError::EmptyUtterance) {
            warn!(session = %id, error = %e, "message failed");
        }
        status_for(&e)
    })?;

    // no subscribers is fine
    let _ = entry.update_tx.send(SessionUpdate::from_reply(&id, &reply));

    Ok(Json(reply))
}

/// Detailed reading for one menu
async fn get_fortune(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FortuneSelectRequest>,
) -> Result<Json<FortuneResult>, StatusCode> {
    let entry = state.entry(&id).await?;
    let mut session = entry.session.lock().await;
    let result = session.fortune(&req.menu_id).await.map_err(|e| status_for(&e))?;
    Ok(Json(result))
}

/// Every menu, best first
async fn get_menus(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RankedMenu>>, StatusCode> {
    let entry = state.entry(&id).await?;
    let session = entry.session.lock().await;
    Ok(Json(session.ranked_menus()))
}

/// Event log export
async fn get_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let entry = state.entry(&id).await?;
    let session = entry.session.lock().await;
    let content = session.export_log().map_err(|e| status_for(&e))?;

    Ok((StatusCode::OK, [("content-type", "application/json")], content))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let entry = state.entry(&id).await?;
    let rx = entry.update_tx.subscribe();

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Handle WebSocket connection
async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    while let Ok(update) = rx.recv().await {
        let json = serde_json::to_string(&update).unwrap_or_default();
        if socket.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

/// Run the API server
pub async fn run_server(addr: &str, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let backend = state.backend.name().to_string();
    let router = router_with_state(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, backend = %backend, "RESORT-TI API listening");
    println!("🔮 RESORT-TI API running on {}", addr);
    println!("  GET  /health               - Health check");
    println!("  POST /session/new          - Create session");
    println!("  GET  /session/:id          - Get status");
    println!("  POST /session/:id/message  - Send message");
    println!("  POST /session/:id/fortune  - Fortune detail");
    println!("  GET  /session/:id/menus    - Ranked menus");
    println!("  GET  /session/:id/logs     - Event log");
    println!("  WS   /ws/:id               - Live updates");
    axum::serve(listener, router).await?;
    Ok(())
}
