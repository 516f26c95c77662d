//! 翻译适配器集成测试，使用 mockito 模拟上游 API

use lingo_relay::domain::error::{error_chain, TranslateError};
use lingo_relay::domain::model::{ResolvedConfig, StreamEvent, TranslationRequest};
use lingo_relay::domain::traits::TranslationService;
use lingo_relay::infrastructure::network::client::ChatTranslator;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn translator(base_url: String, platform_id: &str, api_key: &str) -> ChatTranslator {
    let config = ResolvedConfig {
        platform_id: platform_id.to_string(),
        api_key: api_key.to_string(),
        base_url,
        model: "test-model".to_string(),
    };
    ChatTranslator::new(reqwest::Client::new(), config, Duration::from_secs(5))
}

async fn collect(service: &dyn TranslationService, request: &TranslationRequest) -> Vec<StreamEvent> {
    let mut events = service.translate_stream(request).await;
    let mut out = Vec::new();
    while let Some(event) = events.next_event().await {
        out.push(event);
    }
    // 序列耗尽后不再产生事件
    assert!(events.next_event().await.is_none());
    out
}

#[tokio::test]
async fn test_non_stream_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "stream": false,
            "max_tokens": 4000
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{"message": {"role": "assistant", "content": "  Hello, world!\n"}}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let t = translator(format!("{}/v1/", server.url()), "openai", "sk-test-key");
    let result = t
        .translate_text(&TranslationRequest::new("你好，世界！", "English"))
        .await
        .unwrap();

    assert_eq!(result, "Hello, world!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_local_platform_request_shape() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "Hallo"}}]}).to_string())
        .create_async()
        .await;

    let t = translator(format!("{}/v1", server.url()), "ollama", "ollama");
    let payload = serde_json::to_value(t.payload(&TranslationRequest::new("Hi", "German"))).unwrap();
    assert!(payload.get("temperature").is_none());

    let result = t
        .translate_text(&TranslationRequest::new("Hi", "German"))
        .await
        .unwrap();
    assert_eq!(result, "Hallo");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_validation_issues_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "openai", "sk-test-key");

    let err = t
        .translate_text(&TranslationRequest::new("", "English"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Validation(_)));

    let err = t
        .translate_text(&TranslationRequest::new("text", "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Validation(_)));

    let events = collect(&t, &TranslationRequest::new("", "English").streaming(true)).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Error(m) if m.contains("Text to translate cannot be empty")));

    let events = collect(&t, &TranslationRequest::new("text", "").streaming(true)).await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StreamEvent::Error(m) if m.contains("Target language cannot be empty")));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_in_both_modes() {
    let mut server = Server::new_async().await;
    let body = json!({"error": {"message": "Invalid API key provided"}}).to_string();
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(&body)
        .expect(2)
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "openai", "sk-bad-key");

    let err = t
        .translate_text(&TranslationRequest::new("Hello", "French"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Http { status: 401, .. }));
    let message = err.to_string();
    assert!(message.contains("Unauthorized"));
    assert!(message.contains("Invalid API key provided"));

    let events = collect(&t, &TranslationRequest::new("Hello", "French").streaming(true)).await;
    assert_eq!(events, vec![StreamEvent::Error(message)]);
}

#[tokio::test]
async fn test_server_error_hint() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("upstream overloaded")
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "deepseek", "sk-test-key");

    let err = t
        .translate_text(&TranslationRequest::new("Hello", "French"))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("API HTTP Error 503"));
    assert!(message.contains("API Server Error"));
    assert!(message.contains("upstream overloaded"));
}

#[tokio::test]
async fn test_missing_content_is_format_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "openai", "sk-test-key");

    let err = t
        .translate_text(&TranslationRequest::new("Hello", "French"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::ResponseFormat(_)));
}

#[tokio::test]
async fn test_non_json_body_is_format_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "openai", "sk-test-key");

    let err = t
        .translate_text(&TranslationRequest::new("Hello", "French"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::ResponseFormat(_)));
}

#[tokio::test]
async fn test_stream_success() {
    let mut server = Server::new_async().await;
    let frame = |s: &str| format!("data: {}\n\n", json!({"choices": [{"delta": {"content": s}}]}));
    let body = format!(
        ": keep-alive\n\n{}{}{}data: [DONE]\n\n",
        frame("Bon"),
        frame("jour"),
        frame(" le monde")
    );
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::PartialJson(json!({"stream": true})))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;
    let t = translator(format!("{}/v1", server.url()), "siliconflow", "sk-test-key");

    let events = collect(
        &t,
        &TranslationRequest::new("Hello world", "French").streaming(true),
    )
    .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::TextChunk("Bon".to_string()),
            StreamEvent::TextChunk("jour".to_string()),
            StreamEvent::TextChunk(" le monde".to_string()),
            StreamEvent::Done,
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_network_failure_in_both_modes() {
    // 端口 1 上没有服务，连接会被拒绝
    let t = translator("http://127.0.0.1:1/v1".to_string(), "custom", "sk-test-key");

    let err = t
        .translate_text(&TranslationRequest::new("Hello", "French"))
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::Network(_)));
    let message = err.to_string();
    assert!(message.starts_with("Network/Request Error"));
    // 必须带上底层原因，区分连接拒绝、超时和域名解析失败
    assert!(names_connect_cause(&message), "cause missing: {}", message);

    let events = collect(&t, &TranslationRequest::new("Hello", "French").streaming(true)).await;
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::Error(m) => {
            assert!(m.starts_with("Network/Request Error"));
            assert!(names_connect_cause(m), "cause missing: {}", m);
        }
        other => panic!("expected error event, got {:?}", other),
    }
}

fn names_connect_cause(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("refused") || lower.contains("connect")
}

#[test]
fn test_endpoint_strips_trailing_slash() {
    let t = translator("https://api.deepseek.com/v1/".to_string(), "deepseek", "k");
    assert_eq!(t.endpoint(), "https://api.deepseek.com/v1/chat/completions");
}

#[derive(Debug)]
struct Layer {
    message: &'static str,
    cause: Option<Box<Layer>>,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for Layer {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

#[test]
fn test_error_chain_includes_causes() {
    let err = Layer {
        message: "error sending request",
        cause: Some(Box::new(Layer {
            message: "client error (Connect)",
            cause: Some(Box::new(Layer {
                message: "Connection refused (os error 111)",
                cause: None,
            })),
        })),
    };

    assert_eq!(
        error_chain(&err),
        "error sending request: client error (Connect): Connection refused (os error 111)"
    );
}

#[test]
fn test_error_chain_skips_repeated_text() {
    let err = Layer {
        message: "operation timed out",
        cause: Some(Box::new(Layer {
            message: "timed out",
            cause: None,
        })),
    };

    assert_eq!(error_chain(&err), "operation timed out");
}
