//! Exercises the chat transport client against an in-process mock backend:
//! reply extraction, error classification, history capping, and health probes.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::{ get, post };
use axum::Router;
use serde_json::{ json, Value };
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use qbot::config::TransportConfig;
use qbot::models::chat::{ ChatMessage, Role };
use qbot::transport::{ new_client, TransportError };

async fn spawn_backend(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> TransportConfig {
    TransportConfig {
        base_url: Url::parse(&format!("http://{}", addr)).unwrap(),
        ..TransportConfig::default()
    }
}

fn history(n: usize) -> Vec<ChatMessage> {
    (0..n).map(|i| ChatMessage::new(Role::User, format!("m{}", i))).collect()
}

#[tokio::test]
async fn send_chat_extracts_primary_key() {
    let app = Router::new().route(
        "/api/chat",
        post(|Json(payload): Json<Value>| async move {
            let message = payload["message"].as_str().unwrap_or("").to_string();
            Json(json!({ "response": format!("echo: {}", message) }))
        })
    );
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let reply = client.send_chat("hello", &[]).await.unwrap();
    assert_eq!(reply, "echo: hello");
}

#[tokio::test]
async fn send_chat_falls_back_to_alternate_keys() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { Json(json!({ "content": "hey" })) })
    );
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let reply = client.send_chat("hello", &[]).await.unwrap();
    assert_eq!(reply, "hey");
}

#[tokio::test]
async fn send_chat_uses_placeholder_when_no_key_matches() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { Json(json!({ "timestamp": 1.0 })) })
    );
    let addr = spawn_backend(app).await;

    let config = config_for(addr);
    let placeholder = config.reply_placeholder.clone();
    let client = new_client(config);
    let reply = client.send_chat("hello", &[]).await.unwrap();
    assert_eq!(reply, placeholder);
}

#[tokio::test]
async fn send_chat_caps_history_to_trailing_window() {
    let app = Router::new().route(
        "/api/chat",
        post(|Json(payload): Json<Value>| async move {
            let sent = payload["conversation_history"].as_array().cloned().unwrap_or_default();
            let last = sent
                .last()
                .and_then(|m| m["content"].as_str())
                .unwrap_or("")
                .to_string();
            Json(json!({ "response": format!("{} {}", sent.len(), last) }))
        })
    );
    let addr = spawn_backend(app).await;

    let config = TransportConfig {
        history_limit: 2,
        ..config_for(addr)
    };
    let client = new_client(config);

    let reply = client.send_chat("hello", &history(5)).await.unwrap();
    assert_eq!(reply, "2 m4");
}

#[tokio::test]
async fn non_2xx_response_is_a_status_error() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") })
    );
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let err = client.send_chat("hello", &[]).await.unwrap_err();
    match err {
        TransportError::Status { code, body } => {
            assert_eq!(code, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn slow_backend_is_a_timeout_error() {
    let app = Router::new().route(
        "/api/chat",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({ "response": "too late" }))
        })
    );
    let addr = spawn_backend(app).await;

    let config = TransportConfig {
        chat_timeout: Duration::from_millis(100),
        ..config_for(addr)
    };
    let client = new_client(config);

    let err = client.send_chat("hello", &[]).await.unwrap_err();
    assert!(matches!(err, TransportError::Timeout), "expected Timeout, got {:?}", err);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let app = Router::new().route("/api/chat", post(|| async { "plain text" }));
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let err = client.send_chat("hello", &[]).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "expected Decode, got {:?}", err);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind then drop to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = new_client(config_for(addr));
    let err = client.send_chat("hello", &[]).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "expected Network, got {:?}", err);
}

#[tokio::test]
async fn health_check_reports_backend_message() {
    let app = Router::new().route(
        "/api/health",
        get(|| async {
            Json(json!({ "status": "healthy", "message": "AI Backend is running" }))
        })
    );
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let health = client.check_health().await;
    assert!(health.is_healthy);
    assert_eq!(health.status, 200);
    assert_eq!(health.message, "AI Backend is running");
}

#[tokio::test]
async fn health_check_reports_non_2xx_as_unhealthy() {
    let app = Router::new().route(
        "/api/health",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") })
    );
    let addr = spawn_backend(app).await;

    let client = new_client(config_for(addr));
    let health = client.check_health().await;
    assert!(!health.is_healthy);
    assert_eq!(health.status, 503);
}

#[tokio::test]
async fn health_check_reports_transport_failure_as_status_zero() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = new_client(config_for(addr));
    let health = client.check_health().await;
    assert!(!health.is_healthy);
    assert_eq!(health.status, 0);
    assert!(!health.message.is_empty());
}

#[tokio::test]
async fn extra_headers_are_sent_with_requests() {
    let app = Router::new().route(
        "/api/chat",
        post(|headers: axum::http::HeaderMap| async move {
            let key = headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("missing")
                .to_string();
            Json(json!({ "response": key }))
        })
    );
    let addr = spawn_backend(app).await;

    let config = TransportConfig {
        headers: vec![("X-Api-Key".to_string(), "secret".to_string())],
        ..config_for(addr)
    };
    let client = new_client(config);

    let reply = client.send_chat("hello", &[]).await.unwrap();
    assert_eq!(reply, "secret");
}
