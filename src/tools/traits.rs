//! Tool trait definition.

use serde::{Deserialize, Serialize};

use super::error::ToolError;
use super::schema::ToolSchema;
use super::validate::ValidatedParams;

/// Public definition of a tool, as listed to the calling agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A gated tool: a static schema plus handlers for its operations.
///
/// Handlers only ever see parameters that passed the token gate and the
/// schema validator. `readme` is served by the dispatcher and never reaches
/// [`Tool::execute`].
pub trait Tool: Send + Sync {
    fn schema(&self) -> &ToolSchema;

    /// Tag attached to this tool's log lines.
    fn log_name(&self) -> &str {
        &self.schema().name
    }

    /// Run one operation and return the text of the response.
    fn execute(&self, operation: &str, params: &ValidatedParams) -> Result<String, ToolError>;
}
