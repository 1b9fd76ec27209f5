//! Uploaded documents and the scoped file that holds them while a request runs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, error};

/// Binary payload plus the media type the client declared for it.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: Option<String>,
    pub media_type: Option<String>,
    pub bytes: Bytes,
}

/// An uploaded document persisted in the upload directory.
///
/// The backing file is deleted when this guard drops, which covers every exit
/// path of the owning request: normal return, early `?`, panic unwinding, and
/// cancellation of the request future.
pub struct TransientDocument {
    file: Option<NamedTempFile>,
    path: PathBuf,
    media_type: Option<String>,
}

impl TransientDocument {
    /// Writes `document` into a uniquely-named file under `upload_dir`.
    pub fn persist(upload_dir: &Path, document: &Document) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile_in(upload_dir)
            .with_context(|| format!("Failed to create upload file in {}", upload_dir.display()))?;

        file.write_all(&document.bytes)
            .context("Failed to write uploaded document")?;
        file.flush().context("Failed to flush uploaded document")?;

        let path = file.path().to_path_buf();
        debug!(
            "Stored upload {:?} ({} bytes) at {}",
            document.file_name,
            document.bytes.len(),
            path.display()
        );

        Ok(Self {
            file: Some(file),
            path,
            media_type: document.media_type.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }
}

impl Drop for TransientDocument {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = file.close() {
                error!("Error cleaning up uploaded file {}: {e}", self.path.display());
            } else {
                debug!("Removed upload {}", self.path.display());
            }
        }
    }
}
