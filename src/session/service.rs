// ABOUTME: SessionService — contract of the agent-session runtime the intake pipeline drives.
// ABOUTME: Also defines ModelPreference and WindowHandle, the values that cross that boundary.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which model tier the session should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    #[default]
    Fast,
    Smart,
}

impl ModelPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Smart => "smart",
        }
    }
}

impl fmt::Display for ModelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "smart" => Ok(Self::Smart),
            other => Err(format!(
                "Unknown model preference: '{}'. Expected: fast, smart",
                other
            )),
        }
    }
}

/// Identifies the window a session streams its replies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub String);

impl WindowHandle {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl Default for WindowHandle {
    fn default() -> Self {
        Self::new("main")
    }
}

/// The single long-lived agent session of this process.
///
/// Implementations own the process-wide session state (active flag, current
/// preference); callers only reach it through [`crate::session::SessionBridge`].
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Whether a streaming session is currently running.
    fn is_session_active(&self) -> bool;

    /// Start the streaming session. Starting while active is a no-op.
    async fn start_streaming_session(&self, window: &WindowHandle) -> anyhow::Result<()>;

    /// Cancel the in-flight response. Returns `true` iff something was interrupted.
    async fn interrupt_current_response(&self, window: &WindowHandle) -> anyhow::Result<bool>;

    /// Reset the conversation, optionally resuming a prior session.
    async fn reset_session(&self, resume_session_id: Option<String>) -> anyhow::Result<()>;

    fn current_model_preference(&self) -> ModelPreference;

    /// Persist a new preference. On failure the previous preference stays in effect.
    async fn set_model_preference(&self, preference: ModelPreference) -> anyhow::Result<()>;
}
