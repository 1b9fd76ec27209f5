// Résumé analysis pipeline.
// Implements: text extraction, lexical scoring, AI response validation, orchestration.
// All provider calls go through llm_client; PDF parsing runs inside spawn_blocking.

pub mod extractor;
pub mod handlers;
pub mod orchestrator;
pub mod scoring;
pub mod upload;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use orchestrator::AnalysisPipeline;
