//! Process bootstrap: config, installation identity, unlock token, registry.
//!
//! Everything built here is immutable for the life of the process and is
//! shared read-only by every call.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::config::{self, GateConfig};
use crate::identity::{mint_token, Installation, TokenIdentity};
use crate::tools::{echo, ToolError, ToolRegistry, UnlockToken};
use crate::types::InvocationResponse;

/// Version mixed into the unlock token; a new release invalidates old tokens.
pub const CODE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file name inside the home directory.
pub const CONFIG_FILE: &str = "toolgate.toml";

pub struct Runtime {
    pub config: GateConfig,
    pub installation: Installation,
    pub token: UnlockToken,
    pub registry: ToolRegistry,
}

impl Runtime {
    /// Load config (with env overrides) and identity from `home_dir`.
    pub fn bootstrap(home_dir: &Path) -> Result<Self> {
        if !home_dir.exists() {
            std::fs::create_dir_all(home_dir).with_context(|| {
                format!("Failed to create home directory: {}", home_dir.display())
            })?;
        }

        let config_path = home_dir.join(CONFIG_FILE);
        let cfg = config::load_config_with_env(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        Self::from_config(cfg, home_dir)
    }

    /// Build from an already resolved config.
    pub fn from_config(config: GateConfig, home_dir: &Path) -> Result<Self> {
        let installation_path = config.resolved_installation_path(home_dir);
        let installation = Installation::load_or_create(&installation_path).with_context(|| {
            format!(
                "Failed to load or create installation at {}",
                installation_path.display()
            )
        })?;

        let token = mint_token(&TokenIdentity {
            installation_id: &installation.id,
            user: &config.user,
            code_version: CODE_VERSION,
            tool: echo::BASE_NAME,
        })?;

        let registry = ToolRegistry::with_default(&token, &config.tool_suffix);
        info!(
            "Runtime ready: {} tool(s), suffix '{}'",
            registry.names().len(),
            config.tool_suffix
        );

        Ok(Self {
            config,
            installation,
            token,
            registry,
        })
    }

    /// Handle one line of the stdio host protocol:
    /// `{"tool": <name>, "arguments": <value>}`.
    pub fn handle_line(&self, line: &str) -> InvocationResponse {
        #[derive(Deserialize)]
        struct HostRequest {
            tool: String,
            #[serde(default)]
            arguments: Value,
        }

        match serde_json::from_str::<HostRequest>(line) {
            Ok(req) => self.registry.call(&req.tool, req.arguments),
            Err(e) => {
                let err = ToolError::MalformedRequest {
                    detail: e.to_string(),
                };
                InvocationResponse::from_error(&err, "")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(suffix: &str) -> (tempfile::TempDir, Runtime) {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GateConfig {
            tool_suffix: suffix.into(),
            user: "tester".into(),
            ..GateConfig::default()
        };
        let rt = Runtime::from_config(cfg, dir.path()).unwrap();
        (dir, rt)
    }

    #[test]
    fn token_stable_across_restarts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GateConfig {
            user: "tester".into(),
            ..GateConfig::default()
        };
        let a = Runtime::from_config(cfg.clone(), dir.path()).unwrap();
        let b = Runtime::from_config(cfg, dir.path()).unwrap();
        assert_eq!(a.token, b.token);
        assert_eq!(a.installation.id, b.installation.id);
    }

    #[test]
    fn suffix_names_the_tool() {
        let (_dir, rt) = runtime("_alt");
        assert_eq!(rt.registry.names(), vec!["template_alt"]);
    }

    #[test]
    fn host_line_round_trip() {
        let (_dir, rt) = runtime("");
        let line = format!(
            r#"{{"tool":"template","arguments":{{"input":{{"operation":"echo","text":"x","tool_unlock_token":"{}"}}}}}}"#,
            rt.token
        );
        assert_eq!(rt.handle_line(&line), InvocationResponse::text("x"));
    }

    #[test]
    fn malformed_host_line_is_an_error() {
        let (_dir, rt) = runtime("");
        let resp = rt.handle_line("not json");
        assert!(resp.is_error);
        assert!(resp.first_text().starts_with("Malformed request line: "));
        assert!(!resp.first_text().contains("operation"));

        let resp = rt.handle_line(r#"{"arguments": {}}"#);
        assert!(resp.first_text().starts_with("Malformed request line: missing field `tool`"));
    }
}
