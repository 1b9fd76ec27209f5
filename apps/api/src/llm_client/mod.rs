//! LLM Client: the single point of entry for all AI provider calls.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Providers implement [`AiProvider`] on top of the shared [`LlmClient`] transport,
//! which owns one pooled HTTP client and the retry policy.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod deepseek;
pub mod gemini;
pub mod prompts;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A language-model provider: résumé text and job text in, raw model text out.
///
/// Each implementation owns its prompt and wire format; callers only see text.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Human-readable provider name used in logs and degraded feedback.
    fn name(&self) -> &str;

    async fn complete(&self, resume_text: &str, job_text: &str) -> Result<String, LlmError>;
}

/// How a request authenticates against the provider.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    Bearer(&'a str),
    /// API key passed as the `key` query parameter.
    QueryKey(&'a str),
}

#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Shared HTTP transport for every provider.
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
}

impl LlmClient {
    pub fn new() -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    /// POSTs a JSON body and deserializes the JSON reply.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn post_json<B, R>(&self, url: &str, auth: Auth<'_>, body: &B) -> Result<R, LlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let request = self.client.post(url).json(body);
            let request = match auth {
                Auth::Bearer(token) => request.bearer_auth(token),
                Auth::QueryKey(key) => request.query(&[("key", key)]),
            };

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: provider_error_message(body),
                });
            }

            let text = response.text().await?;
            debug!("LLM call succeeded: {} response bytes", text.len());
            return serde_json::from_str(&text).map_err(LlmError::Parse);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw body.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
