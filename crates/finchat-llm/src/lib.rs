//! LLM provider abstraction layer for finchat
//!
//! This crate provides provider-agnostic access to chat-completion LLMs for
//! the pieces of the pipeline that need free-text generation or structured
//! extraction. It includes:
//!
//! - Completion request/response types (single prompt, no tool calling)
//! - Provider trait for LLM implementations
//! - A Groq provider (OpenAI-compatible chat completions API)

pub mod completion;
pub mod error;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{LlmError, Result};
pub use provider::LlmProvider;
pub use providers::{GroqConfig, GroqProvider};
