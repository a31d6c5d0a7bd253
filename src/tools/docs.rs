//! Documentation responder.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::schema::ToolSchema;

#[derive(Serialize)]
struct DocPayload<'a> {
    description: &'a str,
    /// The caller knows these as the fields that go inside `input`.
    parameters: Value,
}

/// Render the readme plus the real schema, preceded by two newlines so it
/// can be appended to any message. Returns "" when `include` is false or
/// rendering fails.
pub fn render(schema: &ToolSchema, include: bool) -> String {
    if !include {
        return String::new();
    }
    debug!(tool = %schema.name, "Rendering documentation");
    let payload = DocPayload {
        description: &schema.readme,
        parameters: schema.real_parameters.to_json(),
    };
    match serde_json::to_string_pretty(&payload) {
        Ok(json) => format!("\n\n{}", json),
        Err(e) => {
            warn!(tool = %schema.name, "Failed to render documentation: {}", e);
            String::new()
        }
    }
}
