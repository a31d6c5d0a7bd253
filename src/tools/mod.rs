pub mod dispatch;
pub mod docs;
pub mod echo;
pub mod error;
pub mod gate;
pub mod schema;
pub mod traits;
pub mod validate;

pub use dispatch::Dispatcher;
pub use error::ToolError;
pub use gate::{GateDecision, TokenGate, UnlockToken};
pub use schema::{ParamType, ParameterSchema, PropertySpec, ToolSchema};
pub use traits::{Tool, ToolDefinition};
pub use validate::{validate, ValidatedParams};

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::types::InvocationResponse;

// ---------------------------------------------------------------------------
// Tool registry
// ---------------------------------------------------------------------------

/// Gated tools keyed by their public name. Filled once at startup.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Dispatcher>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in tools, all gated by `token`.
    pub fn with_default(token: &UnlockToken, suffix: &str) -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(echo::Echo::new(token, suffix)), TokenGate::new(token.clone()));
        reg
    }

    /// Add a tool. A later registration under the same name replaces the
    /// earlier one.
    pub fn register(&mut self, tool: Arc<dyn Tool>, gate: TokenGate) {
        let name = tool.schema().name.clone();
        if self.tools.contains_key(&name) {
            warn!("Replacing already registered tool '{}'", name);
        }
        info!("Registered tool '{}'", name);
        self.tools.insert(name, Dispatcher::new(tool, gate));
    }

    pub fn get(&self, name: &str) -> Option<&Dispatcher> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Public definitions only; real schemas stay behind `readme`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|d| d.schema().definition()).collect()
    }

    /// Route one raw invocation to the named tool.
    pub fn call(&self, name: &str, raw: Value) -> InvocationResponse {
        match self.get(name) {
            Some(dispatcher) => dispatcher.handle(raw),
            None => {
                let err = ToolError::UnknownTool {
                    name: name.to_string(),
                    available: self.names(),
                };
                warn!("Error: {}", err);
                InvocationResponse::from_error(&err, "")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_registry_lists_public_surface_only() {
        let reg = ToolRegistry::with_default(&UnlockToken::new("zz-secret-42"), "");
        let defs = reg.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "template");
        let rendered = serde_json::to_string(&defs[0].parameters).unwrap();
        assert!(rendered.contains("\"input\""));
        assert!(!rendered.contains("tool_unlock_token\":"));
        assert!(!rendered.contains("zz-secret-42"));
    }

    #[test]
    fn unknown_tool_is_an_error_without_docs() {
        let reg = ToolRegistry::with_default(&UnlockToken::new("tok"), "_x");
        let resp = reg.call("template", json!({"input": {"operation": "readme"}}));
        assert!(resp.is_error);
        assert_eq!(resp.first_text(), "Unknown tool: 'template'. Available tools: template_x");
    }

    #[test]
    fn call_routes_by_name() {
        let reg = ToolRegistry::with_default(&UnlockToken::new("tok"), "_x");
        let resp = reg.call(
            "template_x",
            json!({"input": {"operation": "echo", "text": "hi", "tool_unlock_token": "tok"}}),
        );
        assert_eq!(resp, InvocationResponse::text("hi"));
    }
}
