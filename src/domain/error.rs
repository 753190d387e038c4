//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid configuration values.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown LLM backend '{0}' (expected 'ollama' or 'vllm')")]
    UnknownBackend(String),
}
