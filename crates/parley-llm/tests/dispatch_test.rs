use mockito::Matcher;
use parley_llm::{
    ChatDispatch, ChatMessage, DispatchConfig, Dispatcher, ProviderEndpoints, ProviderError,
    ProviderId, SIMULATED_MARKER,
};
use std::time::Duration;

fn dispatcher_for(base_url: &str) -> Dispatcher {
    let config = DispatchConfig::new()
        .with_simulated_delay(Duration::ZERO)
        .with_endpoints(ProviderEndpoints::all(base_url));
    Dispatcher::new(config).unwrap()
}

fn transcript() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("Be brief."),
        ChatMessage::user("Hello"),
        ChatMessage::assistant("Hi there"),
        ChatMessage::user("What is Rust?"),
    ]
}

#[tokio::test]
async fn test_every_provider_is_simulated_without_credential() {
    let dispatcher = dispatcher_for("http://127.0.0.1:1");

    for provider in ProviderId::ALL {
        let reply = dispatcher
            .dispatch(provider, &transcript(), None)
            .await
            .unwrap();
        assert!(reply.contains(SIMULATED_MARKER), "{provider}: {reply}");
    }
}

#[tokio::test]
async fn test_blank_credential_is_simulated() {
    let dispatcher = dispatcher_for("http://127.0.0.1:1");
    let reply = dispatcher
        .dispatch(ProviderId::OpenAI, &transcript(), Some("   "))
        .await
        .unwrap();
    assert!(reply.contains(SIMULATED_MARKER));
    assert!(reply.contains("ChatGPT"));
}

#[tokio::test]
async fn test_lovable_is_simulated_even_with_credential() {
    let dispatcher = dispatcher_for("http://127.0.0.1:1");
    let reply = dispatcher
        .dispatch(ProviderId::Lovable, &transcript(), Some("real-key"))
        .await
        .unwrap();
    assert!(reply.contains("Lovable"));
}

#[tokio::test]
async fn test_openai_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi there"},
                {"role": "user", "content": "What is Rust?"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "A language."}}]}"#)
        .create_async()
        .await;

    let reply = dispatcher_for(&server.url())
        .dispatch(ProviderId::OpenAI, &transcript(), Some("sk-test"))
        .await
        .unwrap();

    assert_eq!(reply, "A language.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-pro-latest:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "g-test".into()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "contents": [
                {"role": "user", "parts": [{"text": "Hello"}]},
                {"role": "model", "parts": [{"text": "Hi there"}]},
                {"role": "user", "parts": [{"text": "What is Rust?"}]}
            ],
            "generationConfig": {"maxOutputTokens": 1024}
        })))
        .with_status(200)
        .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "A language."}]}}]}"#)
        .create_async()
        .await;

    let reply = dispatcher_for(&server.url())
        .dispatch(ProviderId::Gemini, &transcript(), Some("g-test"))
        .await
        .unwrap();

    assert_eq!(reply, "A language.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "claude-3-haiku-20240307",
            "system": "Be brief.",
            "max_tokens": 1024
        })))
        .with_status(200)
        .with_body(r#"{"content": [{"type": "text", "text": "A language."}]}"#)
        .create_async()
        .await;

    let reply = dispatcher_for(&server.url())
        .dispatch(ProviderId::Anthropic, &transcript(), Some("ak-test"))
        .await
        .unwrap();

    assert_eq!(reply, "A language.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_perplexity_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer pplx-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "llama-3.1-sonar-small-128k-online",
            "max_tokens": 1000
        })))
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"content": "Sourced answer."}}]}"#)
        .create_async()
        .await;

    let reply = dispatcher_for(&server.url())
        .dispatch(ProviderId::Perplexity, &transcript(), Some("pplx-test"))
        .await
        .unwrap();

    assert_eq!(reply, "Sourced answer.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cohere_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat")
        .match_header("authorization", "Bearer co-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "command-r-plus",
            "message": "What is Rust?",
            "chat_history": [
                {"role": "SYSTEM", "message": "Be brief."},
                {"role": "USER", "message": "Hello"},
                {"role": "CHATBOT", "message": "Hi there"}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"text": "A language."}"#)
        .create_async()
        .await;

    let reply = dispatcher_for(&server.url())
        .dispatch(ProviderId::Cohere, &transcript(), Some("co-test"))
        .await
        .unwrap();

    assert_eq!(reply, "A language.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_lovable_internal_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"content": "Here is a component."}}]}"#)
        .create_async()
        .await;

    let endpoints = ProviderEndpoints {
        lovable: Some(server.url()),
        ..ProviderEndpoints::default()
    };
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_endpoints(endpoints)).unwrap();

    let reply = dispatcher
        .dispatch(ProviderId::Lovable, &transcript(), Some("internal"))
        .await
        .unwrap();

    assert_eq!(reply, "Here is a component.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_lovable_endpoint_needs_no_credential() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"choices": [{"message": {"content": "No key needed."}}]}"#)
        .create_async()
        .await;

    let endpoints = ProviderEndpoints {
        lovable: Some(server.url()),
        ..ProviderEndpoints::default()
    };
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_endpoints(endpoints)).unwrap();

    let reply = dispatcher
        .dispatch(ProviderId::Lovable, &transcript(), None)
        .await
        .unwrap();

    assert_eq!(reply, "No key needed.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = dispatcher_for(&server.url())
        .dispatch(ProviderId::OpenAI, &transcript(), Some("sk-bad"))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api {
            provider,
            status,
            message,
        } => {
            assert_eq!(provider, ProviderId::OpenAI);
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_are_typed_for_every_remote_provider() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let dispatcher = dispatcher_for(&server.url());

    let remote = [
        ProviderId::OpenAI,
        ProviderId::Gemini,
        ProviderId::Anthropic,
        ProviderId::Perplexity,
        ProviderId::Cohere,
    ];
    for provider in remote {
        let err = dispatcher
            .dispatch(provider, &transcript(), Some("key"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ProviderError::Api { status: 500, .. }),
            "{provider}: {err:?}"
        );
        assert_eq!(err.provider(), Some(provider));
        assert!(err.upstream_message().ends_with("API error"));
    }
}

#[tokio::test]
async fn test_missing_reply_text_is_empty_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat")
        .with_status(200)
        .with_body(r#"{"text": ""}"#)
        .create_async()
        .await;

    let err = dispatcher_for(&server.url())
        .dispatch(ProviderId::Cohere, &transcript(), Some("co-test"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::EmptyResponse {
            provider: ProviderId::Cohere
        }
    ));
}

#[tokio::test]
async fn test_unregistered_provider_fails_fast() {
    let dispatcher = Dispatcher::empty(DispatchConfig::default()).unwrap();
    assert!(!dispatcher.supports(ProviderId::OpenAI));

    let err = dispatcher
        .dispatch(ProviderId::OpenAI, &transcript(), Some("sk"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnsupportedProvider(ProviderId::OpenAI)
    ));
}
