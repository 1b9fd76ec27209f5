//! AI response validation: turns a provider's raw reply into a typed `AnalysisResult`.
//!
//! Order of checks:
//! 1. strip markdown code fences (any language tag, any case)
//! 2. parse as JSON; failure → `AnalysisError` with the parse reason and raw text
//! 3. a top-level `error` field → `AnalysisError` carrying it verbatim
//! 4. deserialize into `StructuredFeedback`; failure → "invalid structured response"
//!
//! Nothing here panics or returns `Err`: every input maps to exactly one variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::analysis::{AnalysisResult, RewriteSuggestion, StructuredFeedback};

const FENCE: &str = "```";

/// Validates raw provider output.
pub fn validate(raw: &str) -> AnalysisResult {
    let cleaned = strip_code_fences(raw);

    let value: Value = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(e) => {
            warn!("AI response is not valid JSON: {e}");
            return AnalysisResult::error(format!(
                "Failed to parse AI response: {e}. Raw response: {raw}"
            ));
        }
    };

    let Value::Object(object) = value else {
        warn!("AI response is JSON but not an object");
        return AnalysisResult::error("AI returned an invalid structured response: expected a JSON object");
    };

    let object = fold_keys(object);

    if let Some(error) = object.get("error").filter(|v| !v.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return AnalysisResult::error(message);
    }

    match RawFeedback::deserialize(Value::Object(object)) {
        Ok(raw_feedback) => match raw_feedback.into_feedback() {
            Ok(feedback) => AnalysisResult::Feedback(feedback),
            Err(reason) => {
                warn!("AI structured response rejected: {reason}");
                AnalysisResult::error(format!("AI returned an invalid structured response: {reason}"))
            }
        },
        Err(e) => {
            warn!("AI structured response rejected: {e}");
            AnalysisResult::error(format!("AI returned an invalid structured response: {e}"))
        }
    }
}

/// Removes a surrounding ```lang ... ``` wrapper. Text without a leading fence is
/// only trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // Language tag: "json", "JSON", "javascript", ... up to the first non-tag char.
    // Spaces may precede the tag; a newline ends the fence line.
    let body = rest
        .trim_start_matches([' ', '\t'])
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let body = body.trim();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Lower-cases top-level keys and the keys of `rewrites` entries so that field
/// matching is case-insensitive. Mapping values (category and section names) keep
/// their original case.
fn fold_keys(object: Map<String, Value>) -> Map<String, Value> {
    object
        .into_iter()
        .map(|(key, value)| {
            let key = key.to_lowercase();
            let value = match (key.as_str(), value) {
                ("rewrites", Value::Array(items)) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::Object(entry) => Value::Object(
                                entry.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect(),
                            ),
                            other => other,
                        })
                        .collect(),
                ),
                (_, value) => value,
            };
            (key, value)
        })
        .collect()
}

/// Wire shape after key folding. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawFeedback {
    score: f64,
    #[serde(default, rename = "missingskills", deserialize_with = "null_as_default")]
    missing_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    analysis: String,
    #[serde(default, rename = "keywordmatch", deserialize_with = "null_as_default")]
    keyword_match: BTreeMap<String, f64>,
    #[serde(default, rename = "missingkeywords", deserialize_with = "null_as_default")]
    missing_keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    rewrites: Vec<RawRewrite>,
    #[serde(default, rename = "sectionscores", deserialize_with = "null_as_default")]
    section_scores: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RawRewrite {
    #[serde(default, deserialize_with = "null_as_default")]
    original: String,
    #[serde(default, deserialize_with = "null_as_default")]
    improved: String,
}

impl RawFeedback {
    fn into_feedback(self) -> Result<StructuredFeedback, String> {
        if !(0.0..=100.0).contains(&self.score) {
            return Err(format!("score {} is outside 0-100", self.score));
        }

        Ok(StructuredFeedback {
            score: self.score,
            missing_skills: self.missing_skills,
            suggestions: self.suggestions,
            analysis: self.analysis,
            keyword_match: self.keyword_match,
            missing_keywords: self.missing_keywords,
            rewrites: self
                .rewrites
                .into_iter()
                .map(|r| RewriteSuggestion {
                    original: r.original,
                    improved: r.improved,
                })
                .collect(),
            section_scores: self.section_scores,
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
