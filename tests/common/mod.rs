//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ghostline_config::Timing;
use ghostline_engine::{App, AppSettings};
use ghostline_providers::{GeminiApiKey, GeminiClient, InsightError, InsightFut, InsightSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_KEY: &str = "test-key";

pub fn generate_path(model: &str) -> String {
    format!("/models/{model}:generateContent")
}

/// A `generateContent` success body with a single text part.
pub fn text_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Answer every generation request with `text`.
pub async fn mount_text(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(generate_path(TEST_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(text)))
        .mount(server)
        .await;
}

/// Fail every generation request with `status`.
pub async fn mount_status(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(generate_path(TEST_MODEL)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(Some(GeminiApiKey::new(TEST_KEY)))
        .with_model(TEST_MODEL)
        .with_base_url(server.uri())
        .expect("mock server URL is valid")
}

/// Millisecond timings for tests that run on the real clock.
pub fn fast_timing() -> Timing {
    Timing {
        scan_interval: Duration::from_millis(5),
        start_delay: Duration::from_millis(5),
        finish_delay: Duration::from_millis(5),
        reveal_interval: Duration::from_millis(1),
    }
}

pub fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

pub fn app_with(tokens: Vec<String>, timing: Timing, source: Arc<dyn InsightSource>) -> App {
    let settings = AppSettings {
        tokens,
        timing,
        ui_options: Default::default(),
    };
    App::new(settings, source).with_picker(|_len: usize| 0)
}

/// Drive `app` until it has appended its closing line or `limit` elapses.
pub async fn run_to_completion(app: &mut App, limit: Duration) {
    let finished = tokio::time::timeout(limit, async {
        while !app.log().last().is_some_and(|entry| {
            entry.content() == ghostline_core::script::CONNECTION_SEVERED
        }) {
            app.wait_for_event().await;
        }
    })
    .await;
    assert!(finished.is_ok(), "session did not complete: {app:?}");
}

/// In-process insight source that counts calls.
pub struct Canned {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

impl Canned {
    pub fn ok(text: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InsightSource for Canned {
    fn generate<'a>(&'a self, _prompt: &'a str) -> InsightFut<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply;
        Box::pin(async move {
            reply
                .map(ToString::to_string)
                .ok_or_else(|| InsightError::Payload("canned failure".to_string()))
        })
    }
}
