//! LLM client module
//!
//! Provides the chat-completion seam and the streaming Ollama implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod ollama;
pub mod stream;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use ollama::OllamaClient;
pub use types::{ChatRequest, ChatResponse, Message, Role, StreamChunk, TokenUsage};

use crate::config::LlmConfig;

/// Create the chat client described by config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(model = %config.model, base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(OllamaClient::from_config(config)?))
}
