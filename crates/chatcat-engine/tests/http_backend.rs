//! Integration tests for the HTTP backend and a full widget exchange.

use chatcat_engine::{
    ChatBackend, ChatRequest, ChatWidget, Config, HistoryMessage, HttpBackend, Resolution,
    Speaker, TransportError, Turn, WidgetOptions, DEFAULT_GREETING,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> HttpBackend {
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    HttpBackend::from_config(&config).expect("client")
}

fn hello_request() -> ChatRequest {
    ChatRequest {
        history: vec![HistoryMessage {
            role: Speaker::User,
            content: "Hello".into(),
        }],
        new_session: true,
        k_ctx: 5,
    }
}

#[tokio::test]
async fn test_send_posts_json_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "history": [{"role": "user", "content": "Hello"}],
            "new_session": true,
            "k_ctx": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server).send(&hello_request()).await.unwrap();
    assert_eq!(reply.reply, "Hi there");
}

#[tokio::test]
async fn test_non_success_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .send(&hello_request())
        .await
        .unwrap_err();
    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_reply_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "nope"})))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .send(&hello_request())
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = HttpBackend::new("http://127.0.0.1:1/chat", "http://127.0.0.1:1/health").unwrap();
    let err = backend.send(&hello_request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn test_health_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let health = backend_for(&server).health().await.unwrap();
    assert!(health.is_ok());
}

#[tokio::test]
async fn test_widget_round_trip_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "history": [
                {"role": "assistant", "content": DEFAULT_GREETING},
                {"role": "user", "content": "Hello"}
            ],
            "new_session": true,
            "k_ctx": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut widget = ChatWidget::new(WidgetOptions::default());
    widget.update_draft("Hello");

    let resolution = widget.exchange(&backend).await.unwrap();
    assert_eq!(resolution, Resolution::Replied(Turn::assistant("Hi there")));
    assert_eq!(widget.transcript().len(), 3);
    assert!(!widget.is_busy());
    assert!(widget.draft().is_empty());
}

#[tokio::test]
async fn test_widget_absorbs_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let mut widget = ChatWidget::default();
    widget.update_draft("Hello");

    let resolution = widget.exchange(&backend).await.unwrap();
    let Resolution::Failed(turn) = resolution else {
        panic!("expected a failed resolution");
    };
    assert_eq!(turn.speaker(), Speaker::Assistant);
    assert_eq!(turn.text(), "Error talking to server: Backend 500: Internal error");
    assert_eq!(widget.transcript().len(), 3);
    assert!(!widget.is_busy());

    // Still interactive afterwards.
    widget.update_draft("again");
    assert!(widget.submit().is_ok());
}
