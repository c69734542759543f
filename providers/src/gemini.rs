//! Google Gemini client for single-shot, non-streaming generation.

use serde_json::{Value, json};

use crate::gemini_types::Response;
use crate::{
    DEFAULT_GEMINI_MODEL, GEMINI_API_BASE_URL, InsightError, InsightFut, InsightSource,
    http_client, plain_http_client, read_capped_error_body,
};

/// Fixed generation parameters for the insight call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    pub const INSIGHT: Self = Self {
        temperature: 0.9,
        top_p: 0.8,
        top_k: 40,
        max_output_tokens: 150,
    };
}

/// Gemini API key.
///
/// `Debug` is manually implemented to redact the key value.
#[derive(Clone)]
pub struct GeminiApiKey(String);

impl GeminiApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GeminiApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeminiApiKey(<redacted>)")
    }
}

/// Build the request body for `generateContent`.
///
/// Note: `generationConfig` and its fields use camelCase.
pub(crate) fn build_request_body(prompt: &str, params: GenerationParams) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": params.temperature,
            "topP": params.top_p,
            "topK": params.top_k,
            "maxOutputTokens": params.max_output_tokens
        }
    })
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<GeminiApiKey>,
    model: String,
    base_url: String,
    params: GenerationParams,
}

impl GeminiClient {
    /// Client against the public API. A missing key is reported when
    /// [`InsightSource::generate`] is called.
    #[must_use]
    pub fn new(api_key: Option<GeminiApiKey>) -> Self {
        Self {
            client: http_client().clone(),
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            params: GenerationParams::INSIGHT,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at another endpoint. Non-HTTPS URLs get a client
    /// without the HTTPS-only restriction.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, InsightError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("https://") {
            self.client = plain_http_client()?;
        }
        self.base_url = base_url;
        Ok(self)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, InsightError> {
        let api_key = self.api_key.as_ref().ok_or(InsightError::MissingApiKey)?;
        let body = build_request_body(prompt, self.params);

        tracing::info!(model = %self.model, "Requesting insight");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.as_str())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = read_capped_error_body(response).await;
            return Err(InsightError::Api { status, body });
        }

        let data: Response = response.json().await?;
        if let Some(error) = data.error.as_ref() {
            return Err(InsightError::Payload(error.message_or_default().to_string()));
        }
        if let Some(reason) = data
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
        {
            tracing::debug!(reason, "Prompt blocked");
        }
        tracing::debug!(finish_reason = ?data.finish_reason(), "Insight received");

        Ok(data.text())
    }
}

impl InsightSource for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> InsightFut<'a> {
        Box::pin(self.generate_text(prompt))
    }
}
