//! Configuration schema for toolgate.toml.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Suffix appended to every tool name, so several differently-named
    /// instances of the same tool can coexist. Overridden by `TOOL_SUFFIX`.
    pub tool_suffix: String,

    /// Path to the installation identity file. Empty means
    /// `<home>/installation.json`.
    pub installation_path: String,

    /// User identity mixed into the unlock token. Empty means "use $USER".
    pub user: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tool_suffix: String::new(),
            installation_path: String::new(),
            user: String::new(),
        }
    }
}

impl GateConfig {
    /// Resolve a path that may contain `~` to an absolute path.
    pub fn resolve_path(&self, path: &str) -> String {
        shellexpand::tilde(path).into_owned()
    }

    /// Resolved installation file path.
    pub fn resolved_installation_path(&self, home_dir: &Path) -> PathBuf {
        if self.installation_path.is_empty() {
            home_dir.join("installation.json")
        } else {
            PathBuf::from(self.resolve_path(&self.installation_path))
        }
    }

    /// Apply environment overrides: `TOOL_SUFFIX` for the name suffix and
    /// `USER` (or `USERNAME`) when no user is configured.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(suffix) = lookup("TOOL_SUFFIX") {
            self.tool_suffix = suffix;
        }
        if self.user.is_empty() {
            self.user = lookup("USER")
                .or_else(|| lookup("USERNAME"))
                .unwrap_or_else(|| "unknown".into());
        }
    }
}
