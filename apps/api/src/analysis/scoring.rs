//! Lexical scoring: deterministic overlap between a résumé and a job description.
//!
//! Algorithm:
//! 1. Tokenize both texts: lower-case, split on runs of non-word characters,
//!    drop tokens of 2 characters or fewer and stopwords.
//! 2. Build the distinct token set of each text.
//! 3. score = |job ∩ résumé| / |job| × 100, or 0 when the job set is empty.
//!
//! The score is NOT symmetric: the job text supplies the denominator, so swapping
//! the arguments generally changes the result.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

/// Tokens this short never count as significant.
const MIN_TOKEN_CHARS: usize = 3;

/// Fraction of the job's significant tokens found in the résumé, as a percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct LexicalScore(f64);

impl LexicalScore {
    pub const ZERO: LexicalScore = LexicalScore(0.0);

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Scores résumé/job overlap. Holds the stopword set, which is read-only after
/// startup and therefore shared freely between concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct LexicalScorer {
    stopwords: HashSet<String>,
}

impl LexicalScorer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self { stopwords }
    }

    /// Loads stopwords from a line-oriented file. A missing file yields an empty set.
    pub fn from_stopword_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let scorer = Self::new(parse_stopwords(&contents));
                info!(
                    "Loaded {} stopwords from {}",
                    scorer.stopword_count(),
                    path.display()
                );
                Ok(scorer)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Stopword file {} not found; scoring without stopwords",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read stopwords from {}", path.display())),
        }
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn score(&self, resume_text: &str, job_text: &str) -> LexicalScore {
        let job_tokens = self.significant_tokens(job_text);
        if job_tokens.is_empty() {
            return LexicalScore::ZERO;
        }

        let resume_tokens = self.significant_tokens(resume_text);
        let common = job_tokens.intersection(&resume_tokens).count();

        LexicalScore(common as f64 / job_tokens.len() as f64 * 100.0)
    }

    /// Distinct lower-cased tokens longer than two characters, minus stopwords.
    pub fn significant_tokens(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !is_word_char(c))
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .filter(|token| !self.stopwords.contains(*token))
            .map(String::from)
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_stopwords(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}
