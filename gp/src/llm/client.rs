//! LlmClient trait definition

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatRequest, ChatResponse, LlmError, StreamChunk};

/// Chat-completion client
///
/// The client is stateless: the caller owns the transcript and sends all of
/// it on every call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Run one completion and return the reduced response
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let (chunk_tx, _) = mpsc::channel(1);
        self.stream(request, chunk_tx).await
    }

    /// Streaming completion for live progress display
    ///
    /// Sends chunks to the provided channel as they arrive.
    /// Returns the reduced response once the stream completes.
    async fn stream(&self, request: ChatRequest, chunk_tx: mpsc::Sender<StreamChunk>)
    -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    use crate::llm::Message;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Vec<Result<String, u16>>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl MockLlmClient {
        /// Replies with each text in turn
        pub fn new(responses: Vec<&str>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self::with_results(responses.into_iter().map(|r| Ok(r.to_string())).collect())
        }

        /// `Err(status)` entries answer with an API error of that status
        pub fn with_results(responses: Vec<Result<String, u16>>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Transcripts received, one per call
        pub fn requests(&self) -> Vec<Vec<Message>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        fn model(&self) -> &str {
            "mock"
        }

        async fn stream(
            &self,
            request: ChatRequest,
            chunk_tx: mpsc::Sender<StreamChunk>,
        ) -> Result<ChatResponse, LlmError> {
            debug!("MockLlmClient::stream: called");
            self.requests.lock().unwrap().push(request.messages);
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(text)) => {
                    let _ = chunk_tx.send(StreamChunk::TextDelta(text.clone())).await;
                    Ok(ChatResponse {
                        content: text.clone(),
                        done_seen: true,
                        chunk_count: 1,
                        ..Default::default()
                    })
                }
                Some(Err(status)) => Err(LlmError::ApiError {
                    status: *status,
                    message: "mock failure".to_string(),
                }),
                None => Err(LlmError::InvalidResponse("No more mock responses".to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec!["Response 1", "Response 2"]);
            let req = ChatRequest::new(vec![Message::user("hi")]);

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, "Response 1");

            let resp2 = client.complete(req).await.unwrap();
            assert_eq!(resp2.content, "Response 2");

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(ChatRequest::new(vec![])).await;
            assert!(result.is_err());
        }
    }
}
