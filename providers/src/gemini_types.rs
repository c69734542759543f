//! Typed `generateContent` response.
//!
//! Only the fields the insight call reads are modeled; everything else is
//! ignored by serde.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Response {
    pub candidates: Option<Vec<Candidate>>,
    pub error: Option<ErrorInfo>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Part {
    pub text: Option<String>,
    /// Thinking content, never shown.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorInfo {
    pub message: Option<String>,
}

impl ErrorInfo {
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("Unknown error")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl Response {
    /// Concatenated visible text of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .as_deref()
            .and_then(<[Candidate]>::first)
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.as_deref())
            .map(|parts| {
                parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .as_deref()
            .and_then(<[Candidate]>::first)
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}
