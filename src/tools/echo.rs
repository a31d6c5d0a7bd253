//! Echo tool: returns the input text verbatim.
//!
//! Also the reference layout for new gated tools: a short public
//! description, a real schema with an `operation` enum, and a readme that
//! embeds the unlock token plus a worked example of every operation.

use tracing::debug;

use super::error::ToolError;
use super::gate::UnlockToken;
use super::schema::{ParamType, ParameterSchema, PropertySpec, ToolSchema, OPERATION_FIELD, TOKEN_FIELD};
use super::traits::Tool;
use super::validate::ValidatedParams;

/// Base tool name; the configured suffix is appended.
pub const BASE_NAME: &str = "template";

/// Tag on this tool's log lines.
pub const LOG_NAME: &str = "TEMPLATE";

const TEXT_FIELD: &str = "text";
const ECHO_OPERATION: &str = "echo";

pub struct Echo {
    schema: ToolSchema,
}

impl Echo {
    /// Build the tool for this installation's token. `suffix` lets several
    /// differently-named instances coexist in one host.
    pub fn new(token: &UnlockToken, suffix: &str) -> Self {
        Self {
            schema: echo_schema(token, &format!("{}{}", BASE_NAME, suffix)),
        }
    }
}

impl Tool for Echo {
    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    fn log_name(&self) -> &str {
        LOG_NAME
    }

    fn execute(&self, operation: &str, params: &ValidatedParams) -> Result<String, ToolError> {
        match operation {
            ECHO_OPERATION => {
                let text = params.get_str(TEXT_FIELD).ok_or_else(|| ToolError::MissingOperationField {
                    field: TEXT_FIELD.into(),
                    operation: ECHO_OPERATION.into(),
                })?;
                debug!(tool = LOG_NAME, "Processing echo request: text length={}", text.len());
                Ok(text.to_string())
            }
            other => Err(ToolError::UnknownOperation {
                operation: other.to_string(),
                available: self.schema.real_parameters.operations(),
            }),
        }
    }
}

fn echo_schema(token: &UnlockToken, name: &str) -> ToolSchema {
    let real = ParameterSchema::new()
        .property(
            PropertySpec::new(OPERATION_FIELD, ParamType::String, "Operation to perform")
                .with_enum(["readme", ECHO_OPERATION]),
        )
        .property(PropertySpec::new(
            TEXT_FIELD,
            ParamType::String,
            "Text to echo back for the echo operation",
        ))
        .property(PropertySpec::new(
            TOKEN_FIELD,
            ParamType::String,
            format!(
                "Security token, {}, obtained from readme operation, or re-provided any time the AI \
                 lost context or gave a wrong token",
                token
            ),
        ))
        .require(OPERATION_FIELD)
        .require(TOKEN_FIELD);

    ToolSchema::new(
        name,
        "Echo back the input text.\n\
         - Use this tool when you need to echo text back (e.g. when testing tool-call infrastructure itself)\n",
        real,
        readme(token),
    )
}

fn readme(token: &UnlockToken) -> String {
    format!(
        r#"
Echo back the input text.

A simple tool for echoing back input text. It is also the reference layout for
gated tools: a minimal public schema plus a usage-safety token.

## Usage-Safety Token System
This tool uses a token system to ensure callers fully understand all details of
using this tool, on every call. The token is specific to this installation, user,
and code version.

Your tool_unlock_token for this installation is: {token}

You MUST include tool_unlock_token in the input dict for all operations.

## Input Structure
All parameters are passed in a single 'input' dict:

1. For this documentation:
   {{
     "input": {{"operation": "readme"}}
   }}

2. For echo operation:
   {{
     "input": {{
       "operation": "echo",
       "text": "Text to echo back",
       "tool_unlock_token": "{token}"
     }}
   }}

## Usage Notes
1. Include the tool_unlock_token in all subsequent operations
2. Text parameter is required for echo operation
3. Maximum text length is not restricted
4. Returns the exact text provided

## Examples
```json
   {{
     "input": {{
       "operation": "echo",
       "text": "Hello from the echo tool",
       "tool_unlock_token": "{token}"
     }}
   }}
```
"#,
        token = token
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate::validate;
    use serde_json::json;

    fn echo() -> Echo {
        Echo::new(&UnlockToken::new("tok-1"), "")
    }

    #[test]
    fn name_takes_suffix() {
        assert_eq!(echo().schema().name, "template");
        assert_eq!(Echo::new(&UnlockToken::new("t"), "_b").schema().name, "template_b");
    }

    #[test]
    fn token_is_discoverable() {
        let tool = echo();
        assert!(tool.schema().readme.contains("tok-1"));
        let desc = &tool.schema().real_parameters.get(TOKEN_FIELD).unwrap().description;
        assert!(desc.contains("tok-1"));
    }

    #[test]
    fn echo_returns_text_verbatim() {
        let raw = json!({"operation": "echo", "text": "  spaced\nlines ", "tool_unlock_token": "tok-1"});
        let tool = echo();
        let params = validate(raw.as_object().unwrap(), &tool.schema().real_parameters, Some("echo")).unwrap();
        assert_eq!(tool.execute("echo", &params).unwrap(), "  spaced\nlines ");
    }

    #[test]
    fn echo_without_text_names_the_field() {
        let raw = json!({"operation": "echo", "tool_unlock_token": "tok-1"});
        let tool = echo();
        let params = validate(raw.as_object().unwrap(), &tool.schema().real_parameters, Some("echo")).unwrap();
        let err = tool.execute("echo", &params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter 'text' is required for echo operation. Please provide this parameter."
        );
    }
}
