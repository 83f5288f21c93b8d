// End-to-end tests for the drafting pipeline and text reviewer against a
// mocked provider.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use taskye_core::{
    AssistError, AssistantConfig, Attachment, Category, DraftRequest, DraftSource, Priority,
    TextReviewer, TicketAssistant,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> AssistantConfig {
    AssistantConfig {
        base_url: format!("{}/v1beta/", server.uri()),
        ..AssistantConfig::default()
    }
    .with_api_key(SecretString::from("k-123".to_string()))
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

async fn mount_models(server: &MockServer, names: &[&str]) {
    let models: Vec<Value> = names
        .iter()
        .map(|n| json!({ "name": n, "supportedGenerationMethods": ["generateContent"] }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .expect(1)
        .mount(server)
        .await;
}

// ── Drafting ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_selects_preferred_model_and_parses_draft() {
    let server = MockServer::start().await;
    mount_models(
        &server,
        &["models/gemini-1.0-pro", "models/gemini-1.5-flash", "models/gemini-2.0-flash"],
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(query_param("key", "k-123"))
        .respond_with(text_response(
            "Sure!\n```json\n{\"title\":\"VPN down\",\"description\":\"VPN refuses connections\",\"priority\":\"High\",\"category\":\"Network\"}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(config(&server));
    let extraction = assistant
        .draft(&DraftRequest::new("vpn is not connecting since this morning"))
        .await
        .unwrap();

    assert_eq!(extraction.source, DraftSource::Model);
    assert_eq!(extraction.model.as_deref(), Some("gemini-1.5-flash"));
    assert_eq!(extraction.draft.title, "VPN down");
    assert_eq!(extraction.draft.priority, Priority::High);
    assert_eq!(extraction.draft.category, Category::Network);
}

#[tokio::test]
async fn test_pinned_model_skips_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(text_response(
            r#"{"title":"Mouse","description":"Mouse broken","priority":"Baixa","categoria":"Hardware"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(config(&server));
    let request = DraftRequest::new("mouse broken").with_model("models/gemini-2.0-flash");
    let extraction = assistant.draft(&request).await.unwrap();

    assert_eq!(extraction.model.as_deref(), Some("gemini-2.0-flash"));
    assert_eq!(extraction.draft.priority, Priority::Low);
    assert_eq!(extraction.draft.category, Category::Hardware);
}

#[tokio::test]
async fn test_unparseable_output_uses_fallback_draft() {
    let server = MockServer::start().await;
    mount_models(&server, &["models/gemini-1.5-flash"]).await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
        .respond_with(text_response("I could not understand the request, sorry."))
        .mount(&server)
        .await;

    let message = "the printer on the third floor keeps jamming every single morning";
    let assistant = TicketAssistant::new(config(&server));
    let extraction = assistant.draft(&DraftRequest::new(message)).await.unwrap();

    assert_eq!(extraction.source, DraftSource::Fallback);
    assert_eq!(
        extraction.draft.title,
        "the printer on the third floor keeps jamming..."
    );
    assert_eq!(extraction.draft.description, message);
    assert_eq!(extraction.draft.priority, Priority::Medium);
    assert_eq!(extraction.draft.category, Category::Other);
}

#[tokio::test]
async fn test_quota_error_is_surfaced_without_fallback() {
    let server = MockServer::start().await;
    mount_models(&server, &["models/gemini-1.5-flash"]).await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(config(&server));
    let err = assistant
        .draft(&DraftRequest::new("laptop will not boot"))
        .await
        .unwrap_err();

    assert!(matches!(err, AssistError::QuotaExceeded { .. }));
    assert!(!err.allows_fallback());
}

#[tokio::test]
async fn test_unreachable_provider_error_hides_api_key() {
    let key = "SUPERSECRET123";
    let config = AssistantConfig {
        base_url: "http://127.0.0.1:1/v1beta/".into(),
        ..AssistantConfig::default()
    }
    .with_api_key(SecretString::from(key.to_string()));

    let err = TicketAssistant::new(config)
        .draft(&DraftRequest::new("printer on floor 2 is jammed"))
        .await
        .unwrap_err();

    assert!(matches!(err, AssistError::Transport { .. }));
    assert!(!err.to_string().contains(key), "leaked key: {err}");
}

#[tokio::test]
async fn test_no_usable_model_never_calls_generation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(text_response("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(config(&server));
    let err = assistant
        .draft(&DraftRequest::new("need access to SAP"))
        .await
        .unwrap_err();

    assert!(matches!(err, AssistError::NoUsableModel));
}

#[tokio::test]
async fn test_empty_candidates_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(AssistantConfig {
        model: Some("gemini-1.5-flash".into()),
        ..config(&server)
    });
    let request = DraftRequest::new("monitor flickers");
    let err = assistant.draft(&request).await.unwrap_err();

    assert!(matches!(err, AssistError::EmptyResponse));
    assert!(err.allows_fallback());
    let fallback = assistant.fallback(&request);
    assert_eq!(fallback.draft.title, "monitor flickers");
    assert_eq!(fallback.source, DraftSource::Fallback);
    assert_eq!(fallback.model.as_deref(), Some("gemini-1.5-flash"));
}

#[tokio::test]
async fn test_attachment_is_sent_as_inline_part() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            let parts = &body["contents"][0]["parts"];
            let ok = parts[0]["text"].as_str().is_some_and(|t| t.contains("(error.png)"))
                && parts[1]["inline_data"]["mime_type"] == "image/png"
                && parts[1]["inline_data"]["data"] == "aGVsbG8=";
            if ok {
                text_response(r#"{"title":"Error dialog","description":"Screenshot shows error 0x80070005"}"#)
            } else {
                ResponseTemplate::new(400)
            }
        })
        .mount(&server)
        .await;

    let assistant = TicketAssistant::new(AssistantConfig {
        model: Some("gemini-1.5-flash".into()),
        ..config(&server)
    });
    let attachment = Attachment::from_bytes("error.png", "image/png", b"hello").unwrap();
    let extraction = assistant
        .draft(&DraftRequest::new("").with_attachment(attachment))
        .await
        .unwrap();

    assert_eq!(extraction.draft.title, "Error dialog");
    assert_eq!(extraction.draft.priority, Priority::Medium);
}

// ── Reviewer ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reviewer_parses_result_and_tolerates_prose() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(text_response(
            "```json\n{\"correctedText\":\"Hello there.\",\"improvements\":[\"Capitalised\"],\"toneAnalysis\":\"Friendly\"}\n```",
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let reviewer = TextReviewer::new(config(&server));
    let result = reviewer
        .analyze("models/gemini-1.5-flash", "hello there", "friendly")
        .await
        .unwrap();
    assert_eq!(result.corrected_text, "Hello there.");
    assert_eq!(result.improvements, vec!["Capitalised"]);

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(text_response("Hello there."))
        .mount(&server)
        .await;

    let fallback = reviewer
        .analyze("gemini-1.5-flash", "hello there", "formal")
        .await
        .unwrap();
    assert_eq!(fallback.corrected_text, "Hello there.");
    assert_eq!(fallback.improvements.len(), 1);
}

#[tokio::test]
async fn test_reviewer_rejects_empty_text_and_empty_model_list() {
    let server = MockServer::start().await;
    mount_models(&server, &[]).await;

    let reviewer = TextReviewer::new(config(&server));
    assert!(matches!(
        reviewer.analyze("gemini-1.5-flash", "   ", "formal").await,
        Err(AssistError::InvalidRequest { .. })
    ));
    assert!(matches!(
        reviewer.available_models().await,
        Err(AssistError::NoUsableModel)
    ));
}
