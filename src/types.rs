//! Shared types used across the tool protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tools::ToolError;

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// A single typed payload inside a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    /// Text carried by this block.
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Uniform envelope returned by every call, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl InvocationResponse {
    /// Successful response with a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Error response with a single text block.
    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Convert a protocol error into the wire envelope, appending `docs`
    /// (already rendered, possibly empty) after the message.
    pub fn from_error(err: &ToolError, docs: &str) -> Self {
        Self::error_text(format!("{}{}", err, docs))
    }

    /// Text of the first content block, or "" when there is none.
    pub fn first_text(&self) -> &str {
        self.content.first().map(ContentBlock::text).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Dispatcher outcomes
// ---------------------------------------------------------------------------

/// Terminal state a single call ended in. Used for logging only; the wire
/// contract is always an [`InvocationResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ReadmeServed,
    GateDenied,
    ValidationFailed,
    UnknownOperation,
    OperationSucceeded,
    OperationFailed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadmeServed => write!(f, "readme_served"),
            Self::GateDenied => write!(f, "gate_denied"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::UnknownOperation => write!(f, "unknown_operation"),
            Self::OperationSucceeded => write!(f, "operation_succeeded"),
            Self::OperationFailed => write!(f, "operation_failed"),
        }
    }
}
