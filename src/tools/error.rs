//! Error taxonomy for the gated tool protocol.
//!
//! Every variant is non-fatal: the dispatcher turns it into an
//! `isError=true` envelope, usually with the tool documentation attached so
//! the calling agent can correct itself on the next call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Invalid input format. Expected an object with tool parameters.")]
    InvalidInputShape,

    #[error(
        "Invalid or missing tool_unlock_token: this indicates your context is missing the \
         following details, which are needed to correctly use this tool:"
    )]
    TokenMissingOrInvalid,

    #[error(
        "Unexpected parameters provided: {}. Expected parameters are: {}. Please consult the attached doc.",
        .unexpected.join(", "),
        .expected.join(", ")
    )]
    UnexpectedField {
        unexpected: Vec<String>,
        expected: Vec<String>,
    },

    #[error(
        "Missing required parameters: {}. Required parameters are: {}",
        .missing.join(", "),
        .required.join(", ")
    )]
    MissingRequiredField {
        missing: Vec<String>,
        required: Vec<String>,
    },

    #[error("Parameter '{field}' must be of type {expected}, got {actual}. Please provide a {expected} value.")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Parameter '{field}' must be one of {allowed}, got '{got}'. Please use one of the allowed values.")]
    EnumViolation {
        field: String,
        /// JSON rendering of the allowed values, e.g. `["readme","echo"]`.
        allowed: String,
        got: String,
    },

    #[error("Unknown operation: '{operation}'. Available operations: {}", .available.join(", "))]
    UnknownOperation {
        operation: String,
        available: Vec<String>,
    },

    #[error("Parameter '{field}' is required for {operation} operation. Please provide this parameter.")]
    MissingOperationField { field: String, operation: String },

    #[error("Error in {tool} operation: {detail}")]
    OperationFault { tool: String, detail: String },

    #[error("Unknown tool: '{name}'. Available tools: {}", .available.join(", "))]
    UnknownTool { name: String, available: Vec<String> },

    /// Host line that is not `{"tool": ..., "arguments": ...}`.
    #[error("Malformed request line: {detail}. Expected {{\"tool\": <name>, \"arguments\": <object>}}.")]
    MalformedRequest { detail: String },
}

impl ToolError {
    /// Whether the error envelope carries the tool documentation.
    ///
    /// Errors raised before a tool is selected have no documentation to
    /// attach.
    pub fn attaches_docs(&self) -> bool {
        !matches!(self, Self::UnknownTool { .. } | Self::MalformedRequest { .. })
    }
}
