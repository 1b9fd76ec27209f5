//! Axum route handlers for the Résumé Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::analysis::upload::Document;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, JobDescriptor, ResumeAnalysisResult};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_TITLE_FIELD: &str = "jobTitle";
const MISSING_INPUT: &str = "Resume and job title are required.";

/// Oversized bodies are reported as such; anything else is malformed input.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// Reads the `resume` file part and the `jobTitle` text part.
/// Fails before anything touches disk when either is missing or blank.
async fn read_submission(mut multipart: Multipart) -> Result<(Document, JobDescriptor), AppError> {
    let mut document: Option<Document> = None;
    let mut job_title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(String::from);
                let media_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Invalid resume upload", e))?;
                document = Some(Document {
                    file_name,
                    media_type,
                    bytes,
                });
            }
            Some(JOB_TITLE_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Invalid job title", e))?;
                job_title = Some(text);
            }
            _ => {}
        }
    }

    let document = document.filter(|d| !d.bytes.is_empty());
    match (document, JobDescriptor::parse(job_title)) {
        (Some(document), Some(job)) => {
            info!(
                "Received request - File: {}, Job Title: {}",
                document.file_name.as_deref().unwrap_or("<unnamed>"),
                job.as_str()
            );
            Ok((document, job))
        }
        _ => Err(AppError::Validation(MISSING_INPUT.to_string())),
    }
}

/// POST /api/resume/analyze-deepseek
///
/// Lexical score plus free-text AI feedback.
pub async fn handle_analyze_lexical(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeAnalysisResult>, AppError> {
    let (document, job) = read_submission(multipart).await?;
    let result = state.pipeline.analyze_lexical(document, &job).await?;
    info!("Analysis completed successfully");
    Ok(Json(result))
}

/// POST /api/resume/analyze-gemini
///
/// Structured AI feedback. A provider-reported problem is still a 200 with an
/// `{"error": ...}` body.
pub async fn handle_analyze_structured(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let (document, job) = read_submission(multipart).await?;
    let result = state.pipeline.analyze_structured(document, &job).await?;
    if result.is_feedback() {
        info!("Analysis completed successfully");
    }
    Ok(Json(result))
}
