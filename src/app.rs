// ABOUTME: App orchestrator — wires host, queue, local session, bridge, and send coordinator.
// ABOUTME: Used by the binary; each CLI command runs against one App instance.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::mpsc;

use crate::attachments::{IncomingAttachment, guess_mime_type};
use crate::config::Config;
use crate::coordinator::{SendCoordinator, SendPayload};
use crate::host::{ConfigHost, HostContext};
use crate::responses::SendMessageResponse;
use crate::session::{
    LocalSession, LocalSessionParams, PreferenceStore, SessionBridge, SessionEvent,
    SessionLogger, WindowHandle, message_queue,
};

/// Top-level application holding the single session of this process.
pub struct App {
    coordinator: SendCoordinator,
    session: LocalSession,
}

impl App {
    /// Build an app from config, reading secrets from the environment.
    pub fn new(config: Config) -> Self {
        ConfigHost::load_env();
        let host = ConfigHost::new(config.clone());

        let transcript = SessionLogger::new(&host.workspace_dir());

        Self::with_parts(
            &config,
            Arc::new(host),
            PreferenceStore::new(Config::preferences_path()),
            Some(transcript),
        )
    }

    /// Build an app from explicit parts. Must be called inside a tokio runtime.
    pub fn with_parts(
        config: &Config,
        host: Arc<dyn HostContext>,
        preferences: PreferenceStore,
        transcript: Option<SessionLogger>,
    ) -> Self {
        let (queue, receiver) = message_queue(config.session.queue_capacity);
        let (event_tx, event_rx) = mpsc::channel::<SessionEvent>(64);
        tokio::spawn(log_session_events(event_rx));

        let session = LocalSession::new(
            receiver,
            LocalSessionParams {
                preferences,
                default_preference: config.session.model,
                transcript,
                response_hold: Duration::from_millis(config.session.response_hold_ms),
                events: Some(event_tx),
            },
        );

        let bridge = SessionBridge::new(Arc::new(session.clone()), WindowHandle::default());
        let coordinator =
            SendCoordinator::new(host, bridge, queue, config.attachments.clone());

        Self {
            coordinator,
            session,
        }
    }

    pub fn coordinator(&self) -> &SendCoordinator {
        &self.coordinator
    }

    pub fn bridge(&self) -> &SessionBridge {
        self.coordinator.bridge()
    }

    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    /// Send and wait until the session has consumed the message.
    pub async fn send_and_wait(&self, payload: SendPayload) -> SendMessageResponse {
        match self.coordinator.submit(Some(payload)).await {
            Ok(accepted) => {
                if !accepted.delivery.consumed().await {
                    tracing::warn!("message was dropped before the session consumed it");
                }
                SendMessageResponse::ok(accepted.attachments)
            }
            Err(e) => {
                tracing::warn!("send rejected: {}", e);
                SendMessageResponse::err(e.to_string())
            }
        }
    }
}

/// Read files from disk into attachments, guessing MIME types from extensions.
pub fn read_attachments(paths: &[impl AsRef<Path>]) -> anyhow::Result<Vec<IncomingAttachment>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let data = std::fs::read(path)
                .with_context(|| format!("failed to read attachment {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
            let mime_type = guess_mime_type(&name);
            Ok(IncomingAttachment::new(name, mime_type, data))
        })
        .collect()
}

async fn log_session_events(mut events: mpsc::Receiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Started => tracing::info!("session is consuming the message queue"),
            SessionEvent::MessageReceived { blocks } => {
                tracing::info!(blocks, "session received message")
            }
            SessionEvent::ResponseDone => tracing::debug!("response finished"),
            SessionEvent::ResponseInterrupted => tracing::info!("response interrupted"),
            SessionEvent::Reset { resume_session_id } => {
                tracing::info!(resume = ?resume_session_id, "session reset")
            }
            SessionEvent::Stopped => tracing::info!("session stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;
    use crate::session::SessionService;

    #[test]
    fn read_attachments_uses_file_name_and_mime() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "# hi").unwrap();

        let attachments = read_attachments(&[&path]).unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].name, "notes.txt");
        assert_eq!(attachments[0].mime_type, "text/plain");
        assert_eq!(attachments[0].size, 4);
    }

    #[test]
    fn read_attachments_reports_missing_file() {
        let err = read_attachments(&["/definitely/not/here.txt"]).unwrap_err();
        assert!(err.to_string().contains("here.txt"));
    }

    #[tokio::test]
    async fn commands_without_messages_leave_no_transcript_files() {
        let tmp = tempfile::tempdir().unwrap();
        let sessions = tmp.path().join("sessions");
        let host = Arc::new(StaticHost {
            api_key: Some("key".to_string()),
            workspace_dir: tmp.path().to_path_buf(),
        });
        let app = App::with_parts(
            &Config::default(),
            host,
            PreferenceStore::new(tmp.path().join("preferences.json")),
            Some(SessionLogger::new_in_dir(&sessions)),
        );

        app.bridge().model_preference();
        assert!(!app.bridge().interrupt().await.success);
        assert!(app.bridge().reset(Some("abc".to_string())).await.success);

        let files = std::fs::read_dir(&sessions).map(|d| d.count()).unwrap_or(0);
        assert_eq!(files, 0);
    }

    #[tokio::test]
    async fn send_and_wait_returns_after_consumption() {
        let tmp = tempfile::tempdir().unwrap();
        let host = Arc::new(StaticHost {
            api_key: Some("key".to_string()),
            workspace_dir: tmp.path().to_path_buf(),
        });
        let app = App::with_parts(
            &Config::default(),
            host,
            PreferenceStore::new(tmp.path().join("preferences.json")),
            None,
        );

        let resp = app.send_and_wait(SendPayload::text("hello")).await;
        assert!(resp.success);
        assert!(app.session().is_session_active());
    }
}
