//! Analysis orchestration: composes extraction, lexical scoring, provider calls
//! and response validation into the two request flows.
//!
//! Lexical flow:    extract → score → (optional) free-text feedback
//! Structured flow: extract → provider → validate → `AnalysisResult`
//!
//! The uploaded document is held by a [`TransientDocument`] guard that lives only
//! for the extraction step, so the file is gone before any provider call starts.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::analysis::extractor::{ExtractedText, TextExtractor};
use crate::analysis::scoring::LexicalScorer;
use crate::analysis::upload::{Document, TransientDocument};
use crate::analysis::validator::validate;
use crate::errors::AppError;
use crate::llm_client::{AiProvider, LlmError};
use crate::models::analysis::{AnalysisResult, JobDescriptor, ResumeAnalysisResult};

pub struct AnalysisPipeline {
    extractor: TextExtractor,
    scorer: LexicalScorer,
    /// Free-text provider for the lexical flow. `None` leaves `ai_feedback` empty.
    feedback_provider: Option<Arc<dyn AiProvider>>,
    /// JSON provider for the structured flow.
    structured_provider: Option<Arc<dyn AiProvider>>,
    upload_dir: PathBuf,
    provider_timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        scorer: LexicalScorer,
        feedback_provider: Option<Arc<dyn AiProvider>>,
        structured_provider: Option<Arc<dyn AiProvider>>,
        upload_dir: PathBuf,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            extractor: TextExtractor,
            scorer,
            feedback_provider,
            structured_provider,
            upload_dir,
            provider_timeout,
        }
    }

    /// Lexical flow. Extraction failures fail the request; provider failures are
    /// reported inside `ai_feedback` instead.
    pub async fn analyze_lexical(
        &self,
        document: Document,
        job: &JobDescriptor,
    ) -> Result<ResumeAnalysisResult, AppError> {
        let text = self.extract(&document).await?;
        let score = self.scorer.score(text.as_str(), job.as_str());
        info!(
            "Lexical score {:.1} over {} page(s)",
            score.value(),
            text.page_count()
        );

        let ai_feedback = match &self.feedback_provider {
            Some(provider) => match self.call_provider(provider.as_ref(), &text, job).await {
                Ok(feedback) => feedback,
                Err(e) => {
                    warn!("{} feedback unavailable: {e}", provider.name());
                    format!("❌ {} error: {e}", provider.name())
                }
            },
            None => String::new(),
        };

        Ok(ResumeAnalysisResult {
            score: score.value(),
            extracted_text: text.into_string(),
            ai_feedback,
        })
    }

    /// Structured flow. Anything the provider does wrong becomes an
    /// `AnalysisResult::Error`; only extraction and I/O failures are `Err`.
    pub async fn analyze_structured(
        &self,
        document: Document,
        job: &JobDescriptor,
    ) -> Result<AnalysisResult, AppError> {
        let text = self.extract(&document).await?;

        let Some(provider) = &self.structured_provider else {
            warn!("Structured analysis requested but no provider is configured");
            return Ok(AnalysisResult::error("Structured AI analysis is not configured"));
        };

        let result = match self.call_provider(provider.as_ref(), &text, job).await {
            Ok(raw) => validate(&raw),
            Err(e) => {
                warn!("{} request failed: {e}", provider.name());
                AnalysisResult::error(format!("{} request failed: {e}", provider.name()))
            }
        };

        match &result {
            AnalysisResult::Feedback(feedback) => {
                info!("Structured analysis completed with score {}", feedback.score)
            }
            AnalysisResult::Error(e) => warn!("Structured analysis returned error: {}", e.message()),
        }
        Ok(result)
    }

    /// Persists the upload, extracts its text, and removes the file again
    /// whether or not extraction succeeded.
    async fn extract(&self, document: &Document) -> Result<ExtractedText, AppError> {
        let stored = TransientDocument::persist(&self.upload_dir, document)?;
        let text = self.extractor.extract(&stored).await?;
        drop(stored);
        Ok(text)
    }

    async fn call_provider(
        &self,
        provider: &dyn AiProvider,
        text: &ExtractedText,
        job: &JobDescriptor,
    ) -> Result<String, LlmError> {
        tokio::time::timeout(
            self.provider_timeout,
            provider.complete(text.as_str(), job.as_str()),
        )
        .await
        .unwrap_or(Err(LlmError::Timeout(self.provider_timeout)))
    }
}
