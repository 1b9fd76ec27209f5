use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,https://ai-resume-analyzer-beryl.vercel.app";

/// Application configuration loaded from environment variables.
/// Startup fails if a numeric variable is malformed. A missing provider key
/// disables that provider rather than failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Line-oriented stopword list. A missing file means "no stopwords".
    pub stopwords_path: PathBuf,
    /// Directory that holds uploaded documents for the lifetime of one request.
    pub upload_dir: PathBuf,
    pub provider_timeout: Duration,
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            deepseek_api_key: optional_env("DEEPSEEK_API_KEY"),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            stopwords_path: std::env::var("STOPWORDS_PATH")
                .unwrap_or_else(|_| "stopwords.txt".to_string())
                .into(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            provider_timeout: Duration::from_secs(
                std::env::var("PROVIDER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes
/// (browsers never send a trailing slash in the Origin header).
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_trailing_slash() {
        let origins = parse_origins(" http://localhost:3000/ , https://app.example.com,, ");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://app.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_default_origins_cover_local_front_end() {
        let origins = parse_origins(DEFAULT_ALLOWED_ORIGINS);
        assert!(origins.contains(&"http://localhost:3000".to_string()));
        assert_eq!(origins.len(), 2);
    }
}
