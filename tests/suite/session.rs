//! Full sessions against a mocked Gemini endpoint.

use std::sync::Arc;
use std::time::Duration;

use ghostline_core::script::{
    CONNECTION_SEVERED, DECODING_FAILED, FINAL_DECODED_REALITY, SEQUENCE_COMPLETE,
    UPLINK_ESTABLISHED,
};
use ghostline_providers::{ERROR_FALLBACK, EMPTY_FALLBACK, GeminiClient};
use ghostline_types::{EntryKind, RunState};
use wiremock::MockServer;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    TEST_KEY, TEST_MODEL, app_with, client_for, fast_timing, generate_path, mount_status,
    mount_text, run_to_completion, text_body, tokens,
};

const LIMIT: Duration = Duration::from_secs(10);

fn contents(app: &ghostline_engine::App) -> Vec<String> {
    app.log().iter().map(|e| e.content().to_string()).collect()
}

#[tokio::test]
async fn session_ends_with_generated_insight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path(TEST_MODEL)))
        .and(header("x-goog-api-key", TEST_KEY))
        .and(body_string_contains("01 10 11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("THE GRID REMEMBERS YOU.")))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_with(
        tokens(&["01", "10", "11"]),
        fast_timing(),
        Arc::new(client_for(&server)),
    );
    assert!(app.start());
    run_to_completion(&mut app, LIMIT).await;

    assert_eq!(app.run_state(), RunState::Finished);
    assert_eq!(app.progress().whole_percent(), 100);
    assert_eq!(
        contents(&app),
        vec![
            UPLINK_ESTABLISHED,
            "01",
            "10",
            "11",
            SEQUENCE_COMPLETE,
            FINAL_DECODED_REALITY,
            "THE GRID REMEMBERS YOU.",
            CONNECTION_SEVERED,
        ]
    );
}

#[tokio::test]
async fn server_error_marks_the_failure_path() {
    let server = MockServer::start().await;
    mount_status(&server, 500, "internal").await;

    let mut app = app_with(tokens(&["1"]), fast_timing(), Arc::new(client_for(&server)));
    app.start();
    run_to_completion(&mut app, LIMIT).await;

    let tail: Vec<String> = contents(&app).into_iter().rev().take(4).rev().collect();
    assert_eq!(
        tail,
        vec![SEQUENCE_COMPLETE, DECODING_FAILED, ERROR_FALLBACK, CONNECTION_SEVERED]
    );
}

#[tokio::test]
async fn empty_candidate_uses_empty_fallback() {
    let server = MockServer::start().await;
    mount_text(&server, "").await;

    let mut app = app_with(tokens(&["1"]), fast_timing(), Arc::new(client_for(&server)));
    app.start();
    run_to_completion(&mut app, LIMIT).await;

    let ai: Vec<_> = app.log().of_kind(EntryKind::Ai).collect();
    assert_eq!(ai.len(), 1);
    assert_eq!(ai[0].content(), EMPTY_FALLBACK);
    assert!(contents(&app).contains(&FINAL_DECODED_REALITY.to_string()));
}

#[tokio::test]
async fn missing_key_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(None)
        .with_model(TEST_MODEL)
        .with_base_url(server.uri())
        .unwrap();
    let mut app = app_with(tokens(&["1"]), fast_timing(), Arc::new(client));
    app.start();
    run_to_completion(&mut app, LIMIT).await;

    let ai = app.log().of_kind(EntryKind::Ai).next().unwrap();
    assert_eq!(ai.content(), ERROR_FALLBACK);
}

#[tokio::test]
async fn escape_sequences_from_the_model_are_stripped() {
    let server = MockServer::start().await;
    mount_text(&server, "\x1b]0;pwned\x07WE SEE \x1b[5mYOU\x1b[0m").await;

    let mut app = app_with(tokens(&["1"]), fast_timing(), Arc::new(client_for(&server)));
    app.start();
    run_to_completion(&mut app, LIMIT).await;

    let ai = app.log().of_kind(EntryKind::Ai).next().unwrap();
    assert_eq!(ai.content(), "WE SEE YOU");
}

#[tokio::test]
async fn teardown_before_reply_appends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_body("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut app = app_with(tokens(&["1"]), fast_timing(), Arc::new(client_for(&server)));
    app.start();
    tokio::time::timeout(LIMIT, async {
        while !app.is_insight_pending() {
            app.wait_for_event().await;
        }
    })
    .await
    .expect("insight request should start");

    app.teardown();
    let quiet = tokio::time::timeout(Duration::from_secs(1), app.wait_for_event()).await;
    assert!(quiet.is_err());
    assert_eq!(app.log().of_kind(EntryKind::Ai).count(), 0);
    assert_eq!(app.log().last().unwrap().content(), SEQUENCE_COMPLETE);
}
