//! LLM provider abstraction for the financial analyst
//!
//! This crate provides provider-agnostic types for talking to hosted
//! Large Language Models:
//!
//! - Message types for conversation turns
//! - Completion request/response types with a builder
//! - Tool definitions, used to force schema-conformant structured output
//! - The [`LlmProvider`] trait
//! - A concrete Groq provider speaking the OpenAI-compatible wire format

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LlmProvider;
pub use tools::ToolDefinition;
