//! Claude API integration for section explanations
//!
//! Provides API key lookup, the HTTP client, SSE stream decoding and the
//! `Explainer` seam the view controller talks to.

pub mod auth;
pub mod client;
pub mod error;
pub mod explainer;
pub mod models;
pub mod prompt;
pub mod streaming;

// Re-export commonly used types
pub use auth::{ApiKeyManager, DEFAULT_API_KEY_VAR};
pub use client::ClaudeClient;
pub use error::ExplainError;
pub use explainer::{ChunkStream, Explainer};
pub use models::{ClaudeModel, CreateMessageRequest, Message, Role, StreamEvent};
