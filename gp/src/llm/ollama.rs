//! Ollama chat API client
//!
//! Implements the LlmClient trait against a local `/api/chat` endpoint with
//! streaming enabled. No retries: the caller's transcript has already grown
//! by the time a request fails, so the failure is surfaced as-is.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::stream::reduce_stream;
use super::{ChatRequest, ChatResponse, LlmClient, LlmError, Message, StreamChunk};
use crate::config::LlmConfig;

/// Ollama chat client
pub struct OllamaClient {
    model: String,
    url: String,
    temperature: Option<f32>,
    http: Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            url: config.chat_url(),
            temperature: config.temperature,
            http,
            timeout,
        })
    }

    /// Build the request body for the chat API
    fn build_request_body(&self, request: &ChatRequest) -> Result<serde_json::Value, LlmError> {
        debug!(%self.model, message_count = request.messages.len(), "build_request_body: called");
        let body = ChatBody {
            model: &self.model,
            messages: &request.messages,
            stream: true,
            options: self.temperature.map(|temperature| ChatOptions { temperature }),
        };
        Ok(serde_json::to_value(body)?)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(
        &self,
        request: ChatRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<ChatResponse, LlmError> {
        debug!(%self.model, %self.url, "stream: called");
        let body = self.build_request_body(&request)?;

        let response = self
            .http
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "stream: API error");
            return Err(LlmError::ApiError { status, message: text });
        }

        let timeout = self.timeout;
        let bytes = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| LlmError::from_reqwest(e, timeout)));
        let reduced = reduce_stream(bytes, &chunk_tx).await?;

        info!(
            model = %self.model,
            chars = reduced.content.len(),
            chunks = reduced.chunk_count,
            skipped = reduced.skipped_lines,
            prompt_tokens = reduced.usage.prompt_tokens,
            completion_tokens = reduced.usage.completion_tokens,
            "Chat stream complete"
        );
        Ok(reduced)
    }
}
