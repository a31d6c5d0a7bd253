//! Installation identity.
//!
//! Generates or loads a random installation id and persists it to
//! `~/.toolgate/installation.json` with strict file permissions. The id is the
//! secret part of every unlock token minted on this machine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Installation file stored at `~/.toolgate/installation.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationFile {
    #[serde(rename = "installationId")]
    pub installation_id: String,
    /// ISO 8601 creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// An in-memory installation handle.
///
/// `Debug` hides the id, which keys every unlock token.
#[derive(Clone)]
pub struct Installation {
    pub id: String,
    pub created_at: String,
    /// Path to the installation file on disk.
    pub path: PathBuf,
}

impl Installation {
    /// Load an existing installation or create a new one at the given path.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Self::generate(path)
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).context("Failed to read installation file")?;
        let file: InstallationFile =
            serde_json::from_str(&contents).context("Failed to parse installation JSON")?;
        if file.installation_id.trim().is_empty() {
            anyhow::bail!("Installation file {} has an empty id", path.display());
        }

        info!("Loaded installation from {}", path.display());

        Ok(Self {
            id: file.installation_id,
            created_at: file.created_at,
            path: path.to_path_buf(),
        })
    }

    /// Generate a fresh installation id and persist it.
    pub fn generate(path: &Path) -> Result<Self> {
        let file = InstallationFile {
            installation_id: ulid::Ulid::new().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, &json).context("Failed to write installation file")?;

        // Restrict permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        info!("Generated new installation at {}", path.display());

        Ok(Self {
            id: file.installation_id,
            created_at: file.created_at,
            path: path.to_path_buf(),
        })
    }
}

impl fmt::Debug for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installation")
            .field("id", &"..")
            .field("created_at", &self.created_at)
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_once_then_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("installation.json");

        let first = Installation::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.id.len(), 26);

        let second = Installation::load_or_create(&path).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn empty_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installation.json");
        std::fs::write(&path, r#"{"installationId": " ", "createdAt": "x"}"#).unwrap();
        assert!(Installation::load(&path).is_err());
    }

    #[test]
    fn debug_hides_the_id() {
        let dir = tempfile::tempdir().unwrap();
        let installation = Installation::generate(&dir.path().join("installation.json")).unwrap();
        let rendered = format!("{installation:?}");
        assert!(!rendered.contains(&installation.id));
        assert!(rendered.contains("installation.json"));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installation.json");
        Installation::generate(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
