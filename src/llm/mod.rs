//! LLM client layer - Anthropic API integration with streaming
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - AnthropicClient implementation
//! - SSE streaming support
//! - MockLlmClient for tests

pub mod anthropic;
pub mod client;
pub mod mock;
pub mod streaming;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, LlmError};
pub use mock::MockLlmClient;
pub use streaming::{StreamChunk, StreamEvent, StreamHandle, StreamParser, create_stream_channel, parse_sse_event};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, Usage};
