//! End-to-end behaviour of the gated echo tool through the registry.

use serde_json::{json, Value};
use toolgate::tools::{ToolRegistry, UnlockToken};
use toolgate::types::InvocationResponse;

const TOKEN: &str = "5f2c9a0e71b4d3e8";

fn registry() -> ToolRegistry {
    ToolRegistry::with_default(&UnlockToken::new(TOKEN), "")
}

fn call(raw: Value) -> InvocationResponse {
    registry().call("template", raw)
}

fn has_docs(resp: &InvocationResponse) -> bool {
    resp.first_text().contains("\n\n{") && resp.first_text().contains("Usage-Safety Token System")
}

#[test]
fn readme_serves_docs_with_token() {
    let resp = call(json!({"input": {"operation": "readme"}}));
    assert!(!resp.is_error);
    assert_eq!(resp.content.len(), 1);
    let text = resp.first_text();
    assert!(text.contains("echo"));
    assert!(text.contains(TOKEN));

    let docs: Value = serde_json::from_str(text.trim_start()).unwrap();
    assert_eq!(docs["parameters"]["properties"]["operation"]["enum"], json!(["readme", "echo"]));
    assert_eq!(docs["parameters"]["required"], json!(["operation", "tool_unlock_token"]));
}

#[test]
fn readme_ignores_token_entirely() {
    for token in [json!(null), json!("wrong"), json!(TOKEN), json!(7)] {
        let resp = call(json!({"input": {"operation": "readme", "tool_unlock_token": token}}));
        assert!(!resp.is_error);
        assert!(has_docs(&resp));
    }
    let bare = call(json!({"operation": "readme"}));
    assert!(!bare.is_error);
}

#[test]
fn valid_echo_returns_text_verbatim() {
    let resp = call(json!({"input": {"operation": "echo", "text": "hello", "tool_unlock_token": TOKEN}}));
    let wire = serde_json::to_value(&resp).unwrap();
    assert_eq!(
        wire,
        json!({"content": [{"type": "text", "text": "hello"}], "isError": false})
    );

    for text in ["", "ünïcödé ✓", "{\"input\":1}", "line1\nline2\n"] {
        let resp = call(json!({"input": {"operation": "echo", "text": text, "tool_unlock_token": TOKEN}}));
        assert_eq!(resp, InvocationResponse::text(text));
    }
}

#[test]
fn wrong_token_returns_docs() {
    let resp = call(json!({"input": {"operation": "echo", "text": "hello", "tool_unlock_token": "wrong"}}));
    assert!(resp.is_error);
    assert!(resp.first_text().starts_with("Invalid or missing tool_unlock_token"));
    assert!(has_docs(&resp));
    assert!(resp.first_text().contains(TOKEN));
}

#[test]
fn missing_or_non_string_token_returns_docs() {
    for raw in [
        json!({"input": {"operation": "echo", "text": "hello"}}),
        json!({"input": {"operation": "echo", "text": "hello", "tool_unlock_token": 12}}),
        json!({"input": {"text": "hello", "tool_unlock_token": "x"}}),
        json!({"input": {}}),
    ] {
        let resp = call(raw);
        assert!(resp.is_error);
        assert!(has_docs(&resp));
    }
}

#[test]
fn missing_text_names_the_field() {
    let resp = call(json!({"input": {"operation": "echo", "tool_unlock_token": TOKEN}}));
    assert!(resp.is_error);
    assert!(resp
        .first_text()
        .starts_with("Parameter 'text' is required for echo operation."));
    assert!(has_docs(&resp));
}

#[test]
fn unknown_operation_is_an_enum_violation() {
    let resp = call(json!({"input": {"operation": "dance", "tool_unlock_token": TOKEN}}));
    assert!(resp.is_error);
    assert!(resp.first_text().starts_with(
        r#"Parameter 'operation' must be one of ["readme","echo"], got 'dance'."#
    ));
    assert!(has_docs(&resp));
}

#[test]
fn unexpected_fields_checked_before_types() {
    let resp = call(json!({"input": {
        "operation": "echo",
        "text": 99,
        "colour": "red",
        "tool_unlock_token": TOKEN
    }}));
    assert!(resp.is_error);
    assert!(resp.first_text().starts_with(
        "Unexpected parameters provided: colour. Expected parameters are: operation, text, tool_unlock_token."
    ));
}

#[test]
fn wrong_text_type_is_reported() {
    let resp = call(json!({"input": {"operation": "echo", "text": ["a"], "tool_unlock_token": TOKEN}}));
    assert!(resp.is_error);
    assert!(resp
        .first_text()
        .starts_with("Parameter 'text' must be of type string, got array."));
    assert!(has_docs(&resp));
}

#[test]
fn non_object_input_is_rejected() {
    for raw in [json!({"input": "readme"}), json!("echo"), json!([1, 2]), json!(null)] {
        let resp = call(raw);
        assert!(resp.is_error);
        assert!(resp.first_text().starts_with("Invalid input format."));
        assert!(has_docs(&resp));
    }
}

#[test]
fn handler_info_never_reaches_validation() {
    let resp = call(json!({
        "handler_info": {"server": "local", "id": 3},
        "input": {"operation": "echo", "text": "routed", "tool_unlock_token": TOKEN}
    }));
    assert_eq!(resp, InvocationResponse::text("routed"));
}

#[test]
fn repeated_calls_are_byte_identical() {
    let reg = registry();
    let inputs = [
        json!({"input": {"operation": "readme"}}),
        json!({"input": {"operation": "echo", "text": "same", "tool_unlock_token": TOKEN}}),
        json!({"input": {"operation": "echo", "tool_unlock_token": "nope"}}),
        json!({"input": {"operation": "dance", "tool_unlock_token": TOKEN}}),
    ];
    for raw in inputs {
        let first = serde_json::to_string(&reg.call("template", raw.clone())).unwrap();
        let second = serde_json::to_string(&reg.call("template", raw)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn concurrent_calls_share_only_immutable_state() {
    let reg = std::sync::Arc::new(registry());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let reg = reg.clone();
            std::thread::spawn(move || {
                let text = format!("msg-{i}");
                let resp = reg.call(
                    "template",
                    json!({"input": {"operation": "echo", "text": text, "tool_unlock_token": TOKEN}}),
                );
                (text, resp)
            })
        })
        .collect();
    for h in handles {
        let (text, resp) = h.join().unwrap();
        assert_eq!(resp, InvocationResponse::text(text));
    }
}
