//! Text-generation client for the closing "insight" message.
//!
//! # Architecture
//!
//! - [`InsightSource`] - the seam: one prompt in, generated text or an error out
//! - [`gemini`] - Google Gemini client (GenerateContent API)
//! - [`request_insight`] - the policy wrapper that never fails
//!
//! # Error Handling
//!
//! [`InsightSource::generate`] reports failures as [`InsightError`].
//! [`request_insight`] absorbs every failure into fixed fallback text, so callers
//! always receive something displayable:
//!
//! | Remote outcome | Result text | Status |
//! |----------------|-------------|--------|
//! | text `X` | `X` | `Generated` |
//! | empty text | [`EMPTY_FALLBACK`] | `Empty` |
//! | any error | [`ERROR_FALLBACK`] | `Failed` (logged) |

pub mod gemini;
mod gemini_types;

use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

pub use gemini::{GeminiApiKey, GeminiClient};

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model for the insight call.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Shown when the model answers with nothing.
pub const EMPTY_FALLBACK: &str = "SYSTEM FAILURE: AI COGNITION DISRUPTED";
/// Shown when the call fails for any reason.
pub const ERROR_FALLBACK: &str = "THE NUMBERS... THEY MEAN SOMETHING... RUN.";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("API returned an error payload: {0}")]
    Payload(String),
}

/// Generation future type alias.
pub type InsightFut<'a> = Pin<Box<dyn Future<Output = Result<String, InsightError>> + Send + 'a>>;

/// A remote text generator.
pub trait InsightSource: Send + Sync {
    /// Perform exactly one generation request for `prompt`.
    fn generate<'a>(&'a self, prompt: &'a str) -> InsightFut<'a>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightStatus {
    Generated,
    Empty,
    Failed,
}

/// Display-ready outcome of [`request_insight`]. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub text: String,
    pub status: InsightStatus,
}

impl Insight {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == InsightStatus::Failed
    }
}

/// Build the prompt for a token sequence. Tokens are joined with single spaces.
#[must_use]
pub fn insight_prompt(tokens: &[String]) -> String {
    let joined = tokens.join(" ");
    format!(
        "Analyze this sequence of binary-like numbers: {joined}.\n\
         Respond as a scary underground hacker AI that has found something terrifying in these numbers.\n\
         Keep it short (2-3 sentences max), cryptic, and glitchy. \
         Do not use formatting like bold or bullet points."
    )
}

/// Ask `source` for the closing message. Never fails.
pub async fn request_insight(source: &dyn InsightSource, tokens: &[String]) -> Insight {
    let prompt = insight_prompt(tokens);
    match source.generate(&prompt).await {
        Ok(text) if text.trim().is_empty() => Insight {
            text: EMPTY_FALLBACK.to_string(),
            status: InsightStatus::Empty,
        },
        Ok(text) => Insight {
            text,
            status: InsightStatus::Generated,
        },
        Err(e) => {
            tracing::error!("Insight request failed: {e}");
            Insight {
                text: ERROR_FALLBACK.to_string(),
                status: InsightStatus::Failed,
            }
        }
    }
}

/// Shared hardened client for HTTPS endpoints.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder()
            .https_only(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Client for a non-HTTPS endpoint (local mock servers, proxies).
pub(crate) fn plain_http_client() -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().build()
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error response body.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
