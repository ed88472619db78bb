mod common;

use std::sync::Arc;

use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;

use newsanalyzer::chat::ConversationDispatcher;
use newsanalyzer::server::{build_rocket, AppState, WELCOME_MESSAGE};

use common::{analyzer, english_article, FakeExtractor, ScriptedLlm};

async fn client(extractor: FakeExtractor) -> Client {
    let extractor = Arc::new(extractor);
    let llm = Arc::new(ScriptedLlm::default());
    let analyzer = Arc::new(analyzer(extractor, llm.clone()));
    let dispatcher = Arc::new(ConversationDispatcher::new(analyzer.clone(), llm, 256));
    let state = AppState::new(analyzer, dispatcher, Some("sutra-v2".to_string()));

    let server = ::common::ServerConfig {
        cors_origins: vec!["http://localhost:3000".to_string()],
        ..::common::ServerConfig::default()
    };
    Client::tracked(build_rocket(state, &server)).await.unwrap()
}

async fn json_body(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
    serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
}

#[tokio::test]
async fn test_index_and_health() {
    let client = client(FakeExtractor::returning(english_article())).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response).await["message"], WELCOME_MESSAGE);

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.into_string().await.as_deref(), Some("OK"));
}

#[tokio::test]
async fn test_status_reports_models() {
    let client = client(FakeExtractor::returning(english_article())).await;
    let body = json_body(client.get("/api/v1/status").dispatch().await).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classifier_mode"], "single");
    assert_eq!(body["chat_model"], "sutra-v2");
}

#[tokio::test]
async fn test_summarize_returns_record() {
    let client = client(FakeExtractor::returning(english_article())).await;

    let response = client
        .post("/summarize")
        .header(ContentType::JSON)
        .body(r#"{"url": "https://example.com/council"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body = json_body(response).await;
    assert_eq!(body["title"], "Council approves budget");
    assert_eq!(body["fake_news"], "Real");
    assert_eq!(body["sentiment"], "Positive");
    assert!(body["readability_score"].is_number());
}

#[tokio::test]
async fn test_summarize_requires_url() {
    let client = client(FakeExtractor::returning(english_article())).await;

    for payload in [r#"{}"#, r#"{"url": "   "}"#] {
        let response = client
            .post("/summarize")
            .header(ContentType::JSON)
            .body(payload)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(json_body(response).await["error"], "url is required");
    }
}

#[tokio::test]
async fn test_summarize_extraction_failure() {
    let client = client(FakeExtractor::failing()).await;

    let response = client
        .post("/summarize")
        .header(ContentType::JSON)
        .body(r#"{"url": "https://example.com/gone"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("could not extract article"));
}

#[tokio::test]
async fn test_chat_greeting_and_analysis() {
    let client = client(FakeExtractor::returning(english_article())).await;

    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(r#"{"history": []}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = json_body(response).await;
    let history = body["history"].as_array().unwrap().clone();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "system");
    assert_eq!(history[1]["role"], "assistant");
    assert!(body["analytics"].is_null());
    assert!(body.get("url").is_none());

    let request = serde_json::json!({
        "history": history,
        "message": "please check example.com/council",
        "analytics": null
    });
    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(request.to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = json_body(response).await;
    assert_eq!(body["url"], "example.com/council");
    assert_eq!(body["analytics"]["title"], "Council approves budget");
    assert_eq!(body["history"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_chat_echoes_analytics_verbatim() {
    let client = client(FakeExtractor::returning(english_article())).await;
    let analytics = r#"{"title":"Old","readability_score":12.50,"custom":{"kept":true}}"#;
    let request = format!(
        r#"{{"history":[{{"role":"system","content":"hi"}},{{"role":"assistant","content":"send a URL"}}],"message":"what is the style?","analytics":{}}}"#,
        analytics
    );

    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(request)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let text = response.into_string().await.unwrap();
    assert!(text.contains(analytics));
}

#[tokio::test]
async fn test_malformed_json_uses_error_shape() {
    let client = client(FakeExtractor::returning(english_article())).await;
    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch()
        .await;
    assert!(response.status().code >= 400);
    assert!(json_body(response).await["error"].is_string());

    let response = client.get("/nowhere").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_cors_headers() {
    let client = client(FakeExtractor::returning(english_article())).await;

    let response = client
        .options("/summarize")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:3000")
    );

    let response = client
        .get("/health")
        .header(Header::new("Origin", "http://other.test"))
        .dispatch()
        .await;
    assert!(response.headers().get_one("Access-Control-Allow-Origin").is_none());
}
