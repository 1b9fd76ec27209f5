//! Test fixtures shared by the analysis tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::analysis::upload::Document;
use crate::llm_client::{AiProvider, LlmError};

/// Builds a minimal, valid PDF with one Helvetica text line per page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let font_id = 3 + 2 * page_count;
    let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    ];
    for (i, text) in pages.iter().enumerate() {
        let content_id = 4 + 2 * i;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {content_id} 0 R \
             /Resources << /Font << /F1 {font_id} 0 R >> >> >>"
        ));
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        let stream = format!("BT /F1 12 Tf 72 712 Td ({escaped}) Tj ET");
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

pub fn pdf_document(pages: &[&str]) -> Document {
    Document {
        file_name: Some("resume.pdf".into()),
        media_type: Some("application/pdf".into()),
        bytes: Bytes::from(pdf_with_pages(pages)),
    }
}

/// What a [`FakeProvider`] does when called.
#[derive(Clone)]
pub enum FakeReply {
    Text(String),
    Fail,
    Hang,
}

/// In-memory `AiProvider` that counts its calls.
pub struct FakeProvider {
    name: &'static str,
    reply: FakeReply,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(name: &'static str, reply: FakeReply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn text(name: &'static str, text: &str) -> Arc<Self> {
        Self::new(name, FakeReply::Text(text.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(&self, _resume_text: &str, _job_text: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Fail => Err(LlmError::Api {
                status: 401,
                message: "invalid api key".to_string(),
            }),
            FakeReply::Hang => std::future::pending().await,
        }
    }
}
