// ABOUTME: Error taxonomy for the message-intake pipeline.
// ABOUTME: Every variant renders a human-readable message that is handed back to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a send request before a queue entry is created.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// No API key is configured, so nothing can reach the agent.
    #[error(
        "No API key configured. Set ANTHROPIC_API_KEY in your environment or in ~/.clawpost/secrets.env."
    )]
    MissingApiKey,

    /// The request carried neither text nor attachments.
    #[error("Message must include text or at least one attachment.")]
    EmptyMessage,

    #[error("Attachment \"{name}\" is {size} bytes, which exceeds the {limit} byte limit.")]
    AttachmentTooLarge { name: String, size: u64, limit: u64 },

    #[error("{source} ({path})")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The consuming side of the message queue is gone.
    #[error("Message queue is closed; the session is no longer accepting messages.")]
    QueueClosed,
}

impl IntakeError {
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_mentions_api_key() {
        let msg = IntakeError::MissingApiKey.to_string();
        assert!(msg.contains("API key"));
        assert!(msg.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn too_large_names_attachment_and_limit() {
        let err = IntakeError::AttachmentTooLarge {
            name: "video.mov".to_string(),
            size: 2048,
            limit: 1024,
        };
        let msg = err.to_string();
        assert!(msg.contains("video.mov"));
        assert!(msg.contains("1024"));
    }

    #[test]
    fn io_error_keeps_underlying_message() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = IntakeError::io("/ws/.attachments", source);
        let msg = err.to_string();
        assert!(msg.starts_with("access denied"));
        assert!(msg.contains("/ws/.attachments"));
    }
}
