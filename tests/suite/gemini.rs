//! The insight request as seen on the wire.

use ghostline_providers::{
    EMPTY_FALLBACK, ERROR_FALLBACK, InsightStatus, insight_prompt, request_insight,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{TEST_KEY, TEST_MODEL, client_for, generate_path, mount_status, mount_text, tokens};

#[tokio::test]
async fn request_carries_prompt_and_generation_config() {
    let server = MockServer::start().await;
    let sequence = tokens(&["0101", "1100"]);
    let prompt = insight_prompt(&sequence);

    Mock::given(method("POST"))
        .and(path(generate_path(TEST_MODEL)))
        .and(header("x-goog-api-key", TEST_KEY))
        .and(body_partial_json(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.9,
                "topP": 0.8,
                "topK": 40,
                "maxOutputTokens": 150
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(crate::common::text_body("RUN.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let insight = request_insight(&client_for(&server), &sequence).await;
    assert_eq!(insight.text, "RUN.");
    assert_eq!(insight.status, InsightStatus::Generated);
}

#[tokio::test]
async fn generated_text_is_returned_verbatim() {
    let server = MockServer::start().await;
    mount_text(&server, "  spaced  out  ").await;

    let insight = request_insight(&client_for(&server), &tokens(&["1"])).await;
    assert_eq!(insight.text, "  spaced  out  ");
}

#[tokio::test]
async fn rate_limit_becomes_error_fallback() {
    let server = MockServer::start().await;
    mount_status(&server, 429, r#"{"error":{"message":"quota"}}"#).await;

    let insight = request_insight(&client_for(&server), &tokens(&["1"])).await;
    assert_eq!(insight.text, ERROR_FALLBACK);
    assert!(insight.is_failure());
}

#[tokio::test]
async fn malformed_json_becomes_error_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let insight = request_insight(&client_for(&server), &tokens(&["1"])).await;
    assert_eq!(insight.text, ERROR_FALLBACK);
}

#[tokio::test]
async fn error_payload_with_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "API key not valid" }
        })))
        .mount(&server)
        .await;

    let insight = request_insight(&client_for(&server), &tokens(&["1"])).await;
    assert_eq!(insight.status, InsightStatus::Failed);
}

#[tokio::test]
async fn no_candidates_becomes_empty_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let insight = request_insight(&client_for(&server), &tokens(&["1"])).await;
    assert_eq!(insight.text, EMPTY_FALLBACK);
    assert_eq!(insight.status, InsightStatus::Empty);
}
