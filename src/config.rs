// ABOUTME: Configuration loading for clawpost.
// ABOUTME: Reads ~/.clawpost/config.toml and exposes the well-known paths under ~/.clawpost.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::session::ModelPreference;

/// Default ceiling for a single attachment (32 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 32 * 1024 * 1024;

/// Default subdirectory of the workspace root that receives attachments.
pub const DEFAULT_ATTACHMENTS_DIR: &str = ".attachments";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace root; the current directory is used when unset.
    pub workspace_dir: Option<PathBuf>,
    pub attachments: AttachmentConfig,
    pub session: SessionConfig,
}

/// Limits and placement for persisted attachments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    pub max_bytes: u64,
    pub dir_name: String,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            dir_name: DEFAULT_ATTACHMENTS_DIR.to_string(),
        }
    }
}

/// Session and queue settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub queue_capacity: usize,
    /// Preference used when none has been persisted yet.
    pub model: ModelPreference,
    /// How long the local session keeps a response open, in milliseconds.
    pub response_hold_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            model: ModelPreference::Fast,
            response_hold_ms: 0,
        }
    }
}

impl Config {
    /// Load config from ~/.clawpost/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(&path)
    }

    /// Load config from an explicit path.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolved workspace root.
    pub fn workspace_root(&self) -> PathBuf {
        self.workspace_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Base directory for all clawpost state.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".clawpost")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Path to the secrets env file loaded at startup.
    pub fn secrets_env_path() -> PathBuf {
        Self::home_dir().join("secrets.env")
    }

    /// Path to the persisted model preference.
    pub fn preferences_path() -> PathBuf {
        Self::home_dir().join("preferences.json")
    }

    /// Directory holding per-workspace session transcripts.
    pub fn sessions_dir() -> PathBuf {
        Self::home_dir().join("sessions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.attachments.max_bytes, 32 * 1024 * 1024);
        assert_eq!(config.attachments.dir_name, ".attachments");
        assert_eq!(config.session.queue_capacity, 16);
        assert_eq!(config.session.model, ModelPreference::Fast);
        assert!(config.workspace_dir.is_none());
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
workspace_dir = "/home/user/project"

[attachments]
max_bytes = 1024
dir_name = "uploads"

[session]
queue_capacity = 4
model = "smart"
response_hold_ms = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.workspace_dir.as_deref(),
            Some(Path::new("/home/user/project"))
        );
        assert_eq!(config.attachments.max_bytes, 1024);
        assert_eq!(config.attachments.dir_name, "uploads");
        assert_eq!(config.session.queue_capacity, 4);
        assert_eq!(config.session.model, ModelPreference::Smart);
        assert_eq!(config.session.response_hold_ms, 250);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let toml_str = r#"
[attachments]
max_bytes = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.attachments.max_bytes, 10);
        assert_eq!(config.attachments.dir_name, ".attachments");
        assert_eq!(config.session.queue_capacity, 16);
    }

    #[test]
    fn explicit_workspace_wins() {
        let config = Config {
            workspace_dir: Some(PathBuf::from("/ws")),
            ..Default::default()
        };
        assert_eq!(config.workspace_root(), PathBuf::from("/ws"));
    }

    #[test]
    fn load_from_path_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[session]\nmodel = \"smart\"\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.session.model, ModelPreference::Smart);
    }
}
