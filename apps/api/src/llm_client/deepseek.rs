//! DeepSeek chat-completion provider. Returns the model's free-text answer as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm_client::prompts::{render, FEEDBACK_PROMPT_TEMPLATE};
use crate::llm_client::{AiProvider, Auth, LlmClient, LlmError};

const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)
    }
}

#[derive(Clone)]
pub struct DeepSeekProvider {
    llm: LlmClient,
    api_key: String,
}

impl DeepSeekProvider {
    pub fn new(llm: LlmClient, api_key: String) -> Self {
        Self { llm, api_key }
    }
}

#[async_trait]
impl AiProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "DeepSeek"
    }

    async fn complete(&self, resume_text: &str, job_text: &str) -> Result<String, LlmError> {
        let prompt = render(FEEDBACK_PROMPT_TEMPLATE, resume_text, job_text);
        let request = ChatRequest {
            model: DEEPSEEK_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response: ChatResponse = self
            .llm
            .post_json(DEEPSEEK_API_URL, Auth::Bearer(&self.api_key), &request)
            .await?;

        let text = response.into_text()?;
        debug!("DeepSeek returned {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_content_returned() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Match score: 72"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Match score: 72");
    }

    #[test]
    fn test_missing_choices_is_empty_content() {
        let response: ChatResponse = serde_json::from_str(r#"{"object": "error"}"#).unwrap();
        assert!(matches!(response.into_text(), Err(LlmError::EmptyContent)));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEEPSEEK_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "deepseek-chat",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }
}
