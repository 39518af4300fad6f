// ABOUTME: Host context — credential and workspace lookups the send coordinator depends on.
// ABOUTME: ConfigHost backs them with the loaded config and the process environment.

use std::path::PathBuf;

use crate::config::Config;

/// Environment variable holding the agent provider API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Lookups answered by the embedding application.
pub trait HostContext: Send + Sync {
    /// Configured API key; `None` blocks every send.
    fn api_key(&self) -> Option<String>;

    /// Workspace root for attachment storage and path relativization.
    fn workspace_dir(&self) -> PathBuf;
}

/// Host backed by [`Config`] and environment variables.
///
/// The key is read on every call so a key added at runtime is picked up.
#[derive(Debug, Clone)]
pub struct ConfigHost {
    config: Config,
}

impl ConfigHost {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Load `.env` from the working directory, then the clawpost secrets file.
    pub fn load_env() {
        let _ = dotenvy::dotenv();
        let _ = dotenvy::from_path(Config::secrets_env_path());
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl HostContext for ConfigHost {
    fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    fn workspace_dir(&self) -> PathBuf {
        self.config.workspace_root()
    }
}

/// Fixed answers, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticHost {
    pub api_key: Option<String>,
    pub workspace_dir: PathBuf,
}

impl HostContext for StaticHost {
    fn api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|key| !key.trim().is_empty())
    }

    fn workspace_dir(&self) -> PathBuf {
        self.workspace_dir.clone()
    }
}
