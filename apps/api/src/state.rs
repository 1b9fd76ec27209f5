use std::sync::Arc;

use crate::analysis::AnalysisPipeline;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extraction, scoring and provider wiring. Read-only after startup.
    pub pipeline: Arc<AnalysisPipeline>,
}
