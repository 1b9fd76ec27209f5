//! Gemini `generateContent` provider. The reply is expected to be JSON matching
//! the structured feedback schema, possibly wrapped in code fences; validation
//! happens downstream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::prompts::{render, STRUCTURED_PROMPT_TEMPLATE};
use crate::llm_client::{AiProvider, Auth, LlmClient, LlmError};

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate; blank counts as empty.
    fn into_text(self) -> Result<String, LlmError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Clone)]
pub struct GeminiProvider {
    llm: LlmClient,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(llm: LlmClient, api_key: String) -> Self {
        Self { llm, api_key }
    }

    fn endpoint() -> String {
        format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent"
        )
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(&self, resume_text: &str, job_text: &str) -> Result<String, LlmError> {
        let prompt = render(STRUCTURED_PROMPT_TEMPLATE, resume_text, job_text);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response: GenerateResponse = self
            .llm
            .post_json(&Self::endpoint(), Auth::QueryKey(&self.api_key), &request)
            .await?;

        let text = response.into_text()?;
        debug!("Gemini returned {} chars", text.len());
        Ok(text)
    }
}
