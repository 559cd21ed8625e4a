//! Integration tests for the HTTP API
//!
//! Drives the router directly with tower's oneshot; the backend is offline so
//! every reply comes from the local fallback.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use resort_ti::core::{create_router, AnalysisEngine, OfflineBackend};
use serde_json::Value;
use tower::ServiceExt;

fn create_test_router() -> Router {
    create_router(Arc::new(AnalysisEngine::default()), Arc::new(OfflineBackend))
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn new_session(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/new")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["session_id"].as_str().unwrap().to_string()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "offline");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_create_session() {
    let app = create_test_router();
    let id = new_session(&app).await;
    assert!(id.starts_with("session_"));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(body_json(response).await["sessions_active"], 1);
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();

    let response = app.oneshot(get("/session/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fresh_session_status() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = app.oneshot(get(&format!("/session/{}", id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["analysis"]["turn"], 0);
    assert_eq!(json["analysis"]["status"], "NOT_READY");
    assert_eq!(json["analysis"]["snapshot"]["composite"]["total"], 0.0);
}

#[tokio::test]
async fn test_send_message() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/session/{}/message", id),
            r#"{"text": "仕事がつらくて疲れた"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["reply"].is_string());
    assert_eq!(json["source"], "F200_FALLBACK_OFFLINE");
    assert_eq!(json["category"]["id"], 1);
    assert_eq!(json["analysis"]["turn"], 1);
    assert_eq!(json["analysis"]["snapshot"]["completeness"]["work_career"], 20.0);

    let status = body_json(app.oneshot(get(&format!("/session/{}", id))).await.unwrap()).await;
    assert_eq!(status["history_len"], 1);
}

#[tokio::test]
async fn test_empty_message_is_bad_request() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(&format!("/session/{}/message", id), r#"{"text": "   "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let status = body_json(app.oneshot(get(&format!("/session/{}", id))).await.unwrap()).await;
    assert_eq!(status["analysis"]["turn"], 0);
}

#[tokio::test]
async fn test_ranked_menus() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = app.oneshot(get(&format!("/session/{}/menus", id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let menus = json.as_array().unwrap();
    assert_eq!(menus.len(), 3);
    assert_eq!(menus[0]["id"], "honesty_reading");
    assert_eq!(menus[0]["match_score"], 50);
}

#[tokio::test]
async fn test_fortune_endpoint() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/session/{}/fortune", id),
            r#"{"menu_id": "love_compatibility"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["menu_id"], "love_compatibility");
    assert_eq!(json["remote"], false);

    let response = app
        .oneshot(post_json(
            &format!("/session/{}/fortune", id),
            r#"{"menu_id": "no_such_menu"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logs_export() {
    let app = create_test_router();
    let id = new_session(&app).await;

    app.clone()
        .oneshot(post_json(&format!("/session/{}/message", id), r#"{"text": "寂しい"}"#))
        .await
        .unwrap();

    let response = app.oneshot(get(&format!("/session/{}/logs", id))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    let types: Vec<&str> = entries.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["user_action", "error", "chat_message"]);
    assert!(entries.iter().all(|e| e["session_id"] == id.as_str()));
}
