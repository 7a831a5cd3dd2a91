//! Streaming support for LLM responses.
//!
//! Provides types for handling streaming responses from the Anthropic API,
//! including stream events, chunks, and handles for managing streaming
//! sessions.

use serde::Deserialize;
use tokio::sync::mpsc;

use crate::llm::types::{CompletionResponse, StopReason, Usage};

/// Events received during streaming from the Anthropic API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Start of message, carries input token usage
    MessageStart {
        #[serde(default)]
        message: MessageMeta,
    },
    /// Start of a content block
    ContentBlockStart {
        index: u32,
    },
    /// Text delta within a content block
    ContentBlockDelta {
        index: u32,
        delta: ContentDelta,
    },
    /// End of a content block
    ContentBlockStop {
        index: u32,
    },
    /// Message delta (stop reason, output token usage)
    MessageDelta {
        delta: StopMeta,
        #[serde(default)]
        usage: Option<UsageMeta>,
    },
    /// Message complete
    MessageStop,
    /// Ping event (keep-alive)
    Ping,
    /// Error event
    Error {
        error: ErrorMeta,
    },
}

/// Message metadata from a message_start event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MessageMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub usage: Option<UsageMeta>,
}

/// Text fragment within a content_block_delta event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ContentDelta {
    #[serde(default)]
    pub text: Option<String>,
}

/// Stop reason within a message_delta event
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StopMeta {
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Token counts within streaming events
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UsageMeta {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Error body within an error event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorMeta {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Chunk types emitted to consumers during streaming.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Text content delta
    Text(String),
    /// Stream completed successfully
    Done,
    /// Stream error
    Error(String),
}

/// Handle for receiving streaming chunks.
pub struct StreamHandle {
    /// Receiver for stream chunks
    pub receiver: mpsc::Receiver<StreamChunk>,
}

impl StreamHandle {
    /// Create a new stream handle with the given receiver.
    pub fn new(receiver: mpsc::Receiver<StreamChunk>) -> Self {
        Self { receiver }
    }

    /// Receive the next chunk from the stream.
    pub async fn recv(&mut self) -> Option<StreamChunk> {
        self.receiver.recv().await
    }

    /// Collect all text from the stream into a single string.
    pub async fn collect_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(chunk) = self.recv().await {
            match chunk {
                StreamChunk::Text(t) => text.push_str(&t),
                StreamChunk::Done | StreamChunk::Error(_) => break,
            }
        }
        text
    }
}

/// Builder for stream handle pairs (sender and handle).
pub fn create_stream_channel(buffer_size: usize) -> (mpsc::Sender<StreamChunk>, StreamHandle) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (tx, StreamHandle::new(rx))
}

/// Parse a raw SSE data payload into a StreamEvent.
///
/// The Anthropic API uses Server-Sent Events (SSE) format:
/// ```text
/// event: message_start
/// data: {"type": "message_start", ...}
/// ```
pub fn parse_sse_event(data: &str) -> Option<StreamEvent> {
    // Skip empty lines and the terminator
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    serde_json::from_str(data).ok()
}

/// State tracker that accumulates stream events into a full response.
#[derive(Debug, Default)]
pub struct StreamParser {
    /// Accumulated text content
    pub text_content: String,
    /// Stop reason reported by the final message_delta
    stop_reason: StopReason,
    /// Token usage accumulated from message_start and message_delta
    usage: Usage,
}

impl StreamParser {
    /// Create a new stream parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a stream event, updating state and emitting chunks.
    pub fn process_event(&mut self, event: StreamEvent) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();

        match event {
            StreamEvent::MessageStart { message } => {
                if let Some(usage) = message.usage {
                    self.usage.input_tokens = usage.input_tokens;
                }
            }
            StreamEvent::ContentBlockDelta { index: _, delta } => {
                if let Some(text) = delta.text {
                    self.text_content.push_str(&text);
                    chunks.push(StreamChunk::Text(text));
                }
            }
            StreamEvent::MessageDelta { delta, usage } => {
                if let Some(reason) = delta.stop_reason.as_deref() {
                    self.stop_reason = StopReason::from_api(reason);
                }
                if let Some(usage) = usage {
                    self.usage.output_tokens = usage.output_tokens;
                }
            }
            StreamEvent::MessageStop => {
                chunks.push(StreamChunk::Done);
            }
            StreamEvent::Error { error } => {
                chunks.push(StreamChunk::Error(error.message));
            }
            _ => {}
        }

        chunks
    }

    /// Build the final response from accumulated state.
    pub fn into_response(self) -> CompletionResponse {
        CompletionResponse {
            content: self.text_content,
            stop_reason: self.stop_reason,
            usage: self.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_event_text_delta() {
        let event = StreamEvent::ContentBlockDelta {
            index: 0,
            delta: ContentDelta {
                text: Some("Hello".to_string()),
            },
        };

        let mut parser = StreamParser::new();
        let chunks = parser.process_event(event);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], StreamChunk::Text("Hello".to_string()));
        assert_eq!(parser.text_content, "Hello");
    }

    #[test]
    fn test_stream_event_message_stop() {
        let event = StreamEvent::MessageStop;

        let mut parser = StreamParser::new();
        let chunks = parser.process_event(event);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], StreamChunk::Done);
    }

    #[test]
    fn test_stream_event_error() {
        let event = StreamEvent::Error {
            error: ErrorMeta {
                message: "Rate limited".to_string(),
                code: Some("rate_limit".to_string()),
            },
        };

        let mut parser = StreamParser::new();
        let chunks = parser.process_event(event);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], StreamChunk::Error("Rate limited".to_string()));
    }

    #[test]
    fn test_stream_parser_accumulates_text() {
        let mut parser = StreamParser::new();

        let events = vec![
            StreamEvent::ContentBlockDelta {
                index: 0,
                delta: ContentDelta {
                    text: Some("Hello ".to_string()),
                },
            },
            StreamEvent::ContentBlockDelta {
                index: 0,
                delta: ContentDelta {
                    text: Some("World".to_string()),
                },
            },
        ];

        for event in events {
            parser.process_event(event);
        }

        assert_eq!(parser.text_content, "Hello World");
    }

    #[test]
    fn test_stream_parser_into_response() {
        let mut parser = StreamParser::new();

        parser.process_event(StreamEvent::MessageStart {
            message: MessageMeta {
                id: Some("msg_01".to_string()),
                usage: Some(UsageMeta {
                    input_tokens: 25,
                    output_tokens: 0,
                }),
            },
        });
        parser.process_event(StreamEvent::ContentBlockDelta {
            index: 0,
            delta: ContentDelta {
                text: Some("A post".to_string()),
            },
        });
        parser.process_event(StreamEvent::MessageDelta {
            delta: StopMeta {
                stop_reason: Some("end_turn".to_string()),
            },
            usage: Some(UsageMeta {
                input_tokens: 0,
                output_tokens: 12,
            }),
        });
        parser.process_event(StreamEvent::MessageStop);

        let response = parser.into_response();
        assert_eq!(response.content, "A post");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 25);
        assert_eq!(response.usage.output_tokens, 12);
    }

    #[test]
    fn test_create_stream_channel() {
        let (tx, handle) = create_stream_channel(10);
        drop(tx);
        assert!(handle.receiver.is_closed());
    }

    #[test]
    fn test_parse_sse_event_valid() {
        let json = r#"{"type": "message_stop"}"#;
        let event = parse_sse_event(json);
        assert_eq!(event, Some(StreamEvent::MessageStop));
    }

    #[test]
    fn test_parse_sse_event_message_start() {
        let json = r#"{"type": "message_start", "message": {"id": "msg_01", "usage": {"input_tokens": 10, "output_tokens": 1}}}"#;
        let event = parse_sse_event(json).unwrap();
        match event {
            StreamEvent::MessageStart { message } => {
                assert_eq!(message.id.as_deref(), Some("msg_01"));
                assert_eq!(message.usage.unwrap().input_tokens, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sse_event_content_delta() {
        let json = r#"{"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "hi"}}"#;
        let event = parse_sse_event(json).unwrap();
        match event {
            StreamEvent::ContentBlockDelta { index, delta } => {
                assert_eq!(index, 0);
                assert_eq!(delta.text.as_deref(), Some("hi"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_parse_sse_event_invalid() {
        let event = parse_sse_event("not json");
        assert!(event.is_none());
    }

    #[test]
    fn test_parse_sse_event_empty() {
        let event = parse_sse_event("");
        assert!(event.is_none());
    }

    #[test]
    fn test_parse_sse_event_done() {
        let event = parse_sse_event("[DONE]");
        assert!(event.is_none());
    }

    #[tokio::test]
    async fn test_stream_handle_recv() {
        let (tx, mut handle) = create_stream_channel(10);

        tx.send(StreamChunk::Text("Hello".to_string())).await.unwrap();
        tx.send(StreamChunk::Done).await.unwrap();
        drop(tx);

        let chunk1 = handle.recv().await;
        assert_eq!(chunk1, Some(StreamChunk::Text("Hello".to_string())));

        let chunk2 = handle.recv().await;
        assert_eq!(chunk2, Some(StreamChunk::Done));
    }

    #[tokio::test]
    async fn test_stream_handle_collect_text() {
        let (tx, mut handle) = create_stream_channel(10);

        tx.send(StreamChunk::Text("Hello ".to_string())).await.unwrap();
        tx.send(StreamChunk::Text("World".to_string())).await.unwrap();
        tx.send(StreamChunk::Done).await.unwrap();
        drop(tx);

        let text = handle.collect_text().await;
        assert_eq!(text, "Hello World");
    }

    #[test]
    fn test_stream_chunk_equality() {
        let chunk1 = StreamChunk::Text("hello".to_string());
        let chunk2 = StreamChunk::Text("hello".to_string());
        let chunk3 = StreamChunk::Text("world".to_string());

        assert_eq!(chunk1, chunk2);
        assert_ne!(chunk1, chunk3);
    }
}
