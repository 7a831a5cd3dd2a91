//! Mock LLM client for tests
//!
//! Replays a scripted sequence of responses and injected failures, one per
//! `complete` call, in order.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::llm::client::{LlmClient, LlmError};
use crate::llm::streaming::StreamChunk;
use crate::llm::types::{CompletionRequest, CompletionResponse, StopReason, Usage};

enum MockReply {
    Response(CompletionResponse),
    Failure(String),
}

/// Scripted LLM client used by unit and integration tests
pub struct MockLlmClient {
    script: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    /// Create a client with an empty script
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append a text response to the script
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(MockReply::Response(CompletionResponse {
            content: text.into(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::new(10, 20),
        }));
        self
    }

    /// Append a full response to the script
    pub fn with_response(self, response: CompletionResponse) -> Self {
        self.script.lock().unwrap().push_back(MockReply::Response(response));
        self
    }

    /// Append an injected failure to the script
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(MockReply::Failure(message.into()));
        self
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Failure(message)) => Err(LlmError::ApiError {
                status: 500,
                message,
            }),
            None => Err(LlmError::InvalidResponse("mock script exhausted".to_string())),
        }
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse, LlmError> {
        let response = self.complete(request).await?;
        let _ = chunk_tx.send(StreamChunk::Text(response.content.clone())).await;
        let _ = chunk_tx.send(StreamChunk::Done).await;
        Ok(response)
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}
