//! Plan pipeline error types

use thiserror::Error;

use crate::llm::LlmError;

/// Malformed caller input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("{field}: '{value}' is not a non-negative integer")]
    InvalidCredits { field: String, value: String },

    #[error("completed credits overflow")]
    CreditOverflow,
}

/// The model's answer could not be read as a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model answer is not a valid plan: {reason}")]
pub struct MalformedPlanError {
    pub reason: String,
    /// The full accumulated answer, for diagnostics
    pub raw: String,
}

impl MalformedPlanError {
    pub fn new(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

/// Errors surfaced by one planning request
///
/// None of these are fatal to the process; the next request runs independently.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("chat endpoint unavailable: {message}")]
    UpstreamUnavailable { status: Option<u16>, message: String },

    #[error(transparent)]
    MalformedPlan(#[from] MalformedPlanError),

    #[error("prompt template failed to render: {0}")]
    Prompt(String),
}

impl From<LlmError> for PlanError {
    fn from(err: LlmError) -> Self {
        let status = err.status();
        let message = match &err {
            LlmError::ApiError { status, message } if message.trim().is_empty() => format!("status {}", status),
            LlmError::ApiError { status, message } => format!("status {}: {}", status, message.trim()),
            other => other.to_string(),
        };
        PlanError::UpstreamUnavailable { status, message }
    }
}
