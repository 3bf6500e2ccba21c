//! Data models for Claude API requests and streamed responses

use serde::{Deserialize, Serialize};

/// Available Claude models
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaudeModel {
    /// Claude Haiku 4.5 - fast and cost-effective
    #[default]
    Haiku45,
    /// Claude Sonnet 4.5
    Sonnet45,
    /// Claude Opus 4.5 - most capable
    Opus45,
}

impl ClaudeModel {
    /// Get the API model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Haiku45 => "claude-haiku-4-5-20251001",
            Self::Sonnet45 => "claude-sonnet-4-5-20250929",
            Self::Opus45 => "claude-opus-4-5-20251101",
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Haiku45 => "Claude Haiku 4.5",
            Self::Sonnet45 => "Claude Sonnet 4.5",
            Self::Opus45 => "Claude Opus 4.5",
        }
    }

    /// Parse model from a short name or a model ID
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "haiku" | "haiku45" | "haiku4.5" | "claude-haiku-4-5-20251001" => Some(Self::Haiku45),
            "sonnet" | "sonnet45" | "sonnet4.5" | "claude-sonnet-4-5-20250929" => {
                Some(Self::Sonnet45)
            }
            "opus" | "opus45" | "opus4.5" | "claude-opus-4-5-20251101" => Some(Self::Opus45),
            _ => None,
        }
    }
}

impl std::str::FromStr for ClaudeModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown model: {}. Options: haiku, sonnet, opus", s))
    }
}

/// Message role in conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant (Claude) message
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Request body for Claude messages API
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    /// Model identifier
    pub model: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Whether to stream the response
    pub stream: bool,
}

impl CreateMessageRequest {
    /// Create a streaming request with default settings
    pub fn new(model: ClaudeModel, messages: Vec<Message>) -> Self {
        Self { model: model.model_id().to_string(), max_tokens: 4096, messages, stream: true }
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Events received from Claude's streaming API (SSE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Message started - contains message ID
    MessageStart {
        /// Unique message identifier
        id: String,
    },
    /// Content block started
    ContentBlockStart,
    /// Content block delta - contains text chunk
    ContentBlockDelta {
        /// Text chunk
        text: String,
    },
    /// Message metadata update
    MessageDelta {
        /// Stop reason (if finished)
        stop_reason: Option<String>,
    },
    /// Content block finished
    ContentBlockStop,
    /// Message finished
    MessageStop,
    /// Keepalive ping
    Ping,
    /// Error from API
    Error {
        /// Error message
        message: String,
    },
}
