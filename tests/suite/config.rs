//! A config file drives the session end to end.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use ghostline_config::GhostlineConfig;
use ghostline_engine::{App, AppSettings};
use ghostline_providers::{GeminiApiKey, GeminiClient};
use ghostline_types::EntryKind;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{generate_path, run_to_completion, text_body};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn config_file_overrides_sequence_timing_and_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path("custom-model")))
        .and(header("x-goog-api-key", "from-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("CONFIGURED.")))
        .expect(1)
        .mount(&server)
        .await;

    let file = write_config(&format!(
        r#"
[app]
reduced_motion = true

[google]
api_key = "from-file"
model = "custom-model"
base_url = "{}/"

[timing]
scan_interval_ms = 5
start_delay_ms = 5
finish_delay_ms = 5

[sequence]
tokens = ["111", "000"]
"#,
        server.uri()
    ));

    let config = GhostlineConfig::load_from(file.path()).unwrap().unwrap();
    let settings = AppSettings::from_config(Some(&config));
    assert!(settings.ui_options.reduced_motion);

    let client = GeminiClient::new(config.api_key().map(GeminiApiKey::new))
        .with_model(config.model().unwrap())
        .with_base_url(config.base_url().unwrap())
        .unwrap();
    let mut app = App::new(settings, Arc::new(client));
    app.start();
    run_to_completion(&mut app, Duration::from_secs(10)).await;

    let binaries: Vec<&str> = app
        .log()
        .of_kind(EntryKind::Binary)
        .map(|e| e.content())
        .collect();
    assert_eq!(binaries, vec!["111", "000"]);
    let ai = app.log().of_kind(EntryKind::Ai).next().unwrap();
    assert_eq!(ai.content(), "CONFIGURED.");
}

#[test]
fn broken_config_reports_its_path() {
    let file = write_config("[timing]\nscan_interval_ms = \"soon\"\n");
    let err = GhostlineConfig::load_from(file.path()).unwrap_err();
    assert_eq!(err.path(), &file.path().to_path_buf());
}

#[test]
fn missing_config_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = GhostlineConfig::load_from(&dir.path().join("config.toml")).unwrap();
    assert!(loaded.is_none());
}
