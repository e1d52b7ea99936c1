use thiserror::Error;

pub mod analytics;
pub mod companion;
pub mod dashboard;
pub mod llm;
pub mod sentiment;

/// Input validation failures surfaced to callers before any provider call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Text is required")]
    TextRequired,
}
