//! Operation dispatcher: the per-call state machine of the gated protocol.
//!
//! Sequence for one call:
//!
//! 1. drop the host's `handler_info` routing annotation
//! 2. unwrap the `{"input": {...}}` container if present
//! 3. `readme` is served immediately, without a token
//! 4. non-object input is rejected
//! 5. the token gate runs; a denied caller gets the documentation back
//! 6. the validator checks the full parameter set against the real schema
//! 7. the validated operation is routed to the tool
//!
//! Every failure, including a panic inside a tool handler, leaves as an
//! `isError=true` envelope. Nothing propagates out of [`Dispatcher::handle`].

use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::docs;
use super::error::ToolError;
use super::gate::{GateDecision, TokenGate};
use super::schema::{ToolSchema, INPUT_FIELD, OPERATION_FIELD, README_OPERATION, TOKEN_FIELD};
use super::traits::Tool;
use super::validate::validate;
use crate::types::{InvocationResponse, Outcome};

/// Transient routing annotation a host may add to the raw parameters.
pub const HANDLER_INFO_FIELD: &str = "handler_info";

type Routed = Result<(Outcome, String), (Outcome, ToolError)>;

/// Gate, validator and docs wrapped around one tool.
#[derive(Clone)]
pub struct Dispatcher {
    tool: Arc<dyn Tool>,
    gate: TokenGate,
}

impl Dispatcher {
    pub fn new(tool: Arc<dyn Tool>, gate: TokenGate) -> Self {
        Self { tool, gate }
    }

    pub fn schema(&self) -> &ToolSchema {
        self.tool.schema()
    }

    pub fn name(&self) -> &str {
        &self.schema().name
    }

    /// Handle one raw invocation. Never panics, never returns a raw error.
    pub fn handle(&self, raw: Value) -> InvocationResponse {
        let log_name = self.tool.log_name();
        let routed = panic::catch_unwind(AssertUnwindSafe(|| self.route(raw))).unwrap_or_else(|payload| {
            Err((
                Outcome::OperationFailed,
                ToolError::OperationFault {
                    tool: self.name().to_string(),
                    detail: panic_message(payload.as_ref()),
                },
            ))
        });

        match routed {
            Ok((outcome, text)) => {
                info!(tool = %log_name, %outcome, "Call completed: response length={}", text.len());
                InvocationResponse::text(text)
            }
            Err((outcome, err)) => {
                warn!(tool = %log_name, %outcome, "Error: {}", err);
                let docs = docs::render(self.schema(), err.attaches_docs());
                InvocationResponse::from_error(&err, &docs)
            }
        }
    }

    fn route(&self, raw: Value) -> Routed {
        let schema = self.schema();
        let params = unwrap_input(strip_handler_info(raw));

        let operation = params.get(OPERATION_FIELD).and_then(Value::as_str);
        if operation == Some(README_OPERATION) {
            debug!(tool = %self.tool.log_name(), "Processing readme request");
            return Ok((Outcome::ReadmeServed, docs::render(schema, true)));
        }

        let Value::Object(map) = &params else {
            return Err((Outcome::ValidationFailed, ToolError::InvalidInputShape));
        };

        let token = map.get(TOKEN_FIELD).and_then(Value::as_str);
        if self.gate.check(token, operation) == GateDecision::Denied {
            return Err((Outcome::GateDenied, ToolError::TokenMissingOrInvalid));
        }

        let validated = validate(map, &schema.real_parameters, operation)
            .map_err(|e| (Outcome::ValidationFailed, e))?;

        let operation = validated.operation().unwrap_or_default();
        let available = schema.real_parameters.operations();
        if operation == README_OPERATION {
            return Ok((Outcome::ReadmeServed, docs::render(schema, true)));
        }
        if !available.iter().any(|op| op == operation) {
            return Err((
                Outcome::UnknownOperation,
                ToolError::UnknownOperation {
                    operation: operation.to_string(),
                    available,
                },
            ));
        }

        self.tool
            .execute(operation, &validated)
            .map(|text| (Outcome::OperationSucceeded, text))
            .map_err(|e| (Outcome::OperationFailed, e))
    }
}

fn strip_handler_info(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) => {
            map.remove(HANDLER_INFO_FIELD);
            Value::Object(map)
        }
        other => other,
    }
}

/// Collapse the single-`input` placeholder that exists only to keep the
/// public schema small.
fn unwrap_input(raw: Value) -> Value {
    match raw {
        Value::Object(mut map) => match map.remove(INPUT_FIELD) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
