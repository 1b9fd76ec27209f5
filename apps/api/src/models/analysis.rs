use std::collections::BTreeMap;

use serde::Serialize;

/// Free text naming or describing the target role, as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor(String);

impl JobDescriptor {
    /// Returns `None` for missing or whitespace-only text.
    pub fn parse(raw: Option<String>) -> Option<Self> {
        raw.filter(|s| !s.trim().is_empty()).map(JobDescriptor)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single before/after rewrite proposed by the AI provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewriteSuggestion {
    pub original: String,
    pub improved: String,
}

/// Schema-validated AI analysis of a résumé against a job description.
/// List and mapping fields are always present; empty when the provider omitted them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredFeedback {
    /// Overall fit, 0-100.
    pub score: f64,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub analysis: String,
    /// Category → percentage match.
    pub keyword_match: BTreeMap<String, f64>,
    pub missing_keywords: Vec<String>,
    pub rewrites: Vec<RewriteSuggestion>,
    /// Section name → score (summary, experience, education, skills, ...).
    pub section_scores: BTreeMap<String, f64>,
}

/// Why structured feedback could not be produced.
/// Serialized as `{"error": "..."}` and returned with a success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisError {
    pub error: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

/// Outcome of the structured-AI flow: feedback or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Feedback(StructuredFeedback),
    Error(AnalysisError),
}

impl AnalysisResult {
    pub fn error(message: impl Into<String>) -> Self {
        AnalysisResult::Error(AnalysisError::new(message))
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self, AnalysisResult::Feedback(_))
    }
}

/// Response of the lexical flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisResult {
    pub score: f64,
    pub extracted_text: String,
    /// Raw provider text, or a description of why it is unavailable.
    pub ai_feedback: String,
}
