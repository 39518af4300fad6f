// ABOUTME: Send coordinator — public entry point of the message-intake pipeline.
// ABOUTME: Pre-checks, persists attachments, builds the message, ensures a session, and enqueues.

use std::sync::Arc;

use serde::Deserialize;

use crate::attachments::{AttachmentStore, IncomingAttachment, PersistedAttachment};
use crate::config::AttachmentConfig;
use crate::error::IntakeError;
use crate::host::HostContext;
use crate::message::build_message;
use crate::responses::SendMessageResponse;
use crate::session::{Delivery, MessageQueue, SessionBridge};

/// A send request as supplied by the UI layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SendPayload {
    pub text: Option<String>,
    pub attachments: Option<Vec<IncomingAttachment>>,
}

impl SendPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attachments: None,
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<IncomingAttachment>) -> Self {
        self.attachments = Some(attachments);
        self
    }
}

/// A request that made it onto the queue.
#[derive(Debug)]
pub struct Accepted {
    pub attachments: Vec<PersistedAttachment>,
    /// Resolves once the session consumes the message.
    pub delivery: Delivery,
}

/// Serializes send requests onto the single session queue.
///
/// Concurrent sends persist and build independently; only the queue orders
/// them, so no lock is held across the pipeline.
#[derive(Clone)]
pub struct SendCoordinator {
    host: Arc<dyn HostContext>,
    bridge: SessionBridge,
    queue: MessageQueue,
    attachments: AttachmentConfig,
}

impl SendCoordinator {
    pub fn new(
        host: Arc<dyn HostContext>,
        bridge: SessionBridge,
        queue: MessageQueue,
        attachments: AttachmentConfig,
    ) -> Self {
        Self {
            host,
            bridge,
            queue,
            attachments,
        }
    }

    pub fn bridge(&self) -> &SessionBridge {
        &self.bridge
    }

    /// Handle a send request. Every failure comes back as `{success: false, error}`.
    pub async fn send(&self, payload: Option<SendPayload>) -> SendMessageResponse {
        match self.submit(payload).await {
            Ok(accepted) => SendMessageResponse::ok(accepted.attachments),
            Err(e) => {
                tracing::warn!("send rejected: {}", e);
                SendMessageResponse::err(e.to_string())
            }
        }
    }

    /// Run the pipeline and hand back the delivery handle.
    ///
    /// Returns once the message is accepted onto the queue, not once it is
    /// answered. On error no queue entry exists.
    pub async fn submit(&self, payload: Option<SendPayload>) -> Result<Accepted, IntakeError> {
        if self.host.api_key().is_none() {
            return Err(IntakeError::MissingApiKey);
        }

        let payload = payload.unwrap_or_default();
        let text = payload.text.as_deref().unwrap_or("").trim().to_string();
        let incoming = payload.attachments.unwrap_or_default();
        if text.is_empty() && incoming.is_empty() {
            return Err(IntakeError::EmptyMessage);
        }

        let store = AttachmentStore::new(self.host.workspace_dir(), &self.attachments);
        let persisted = store.persist(incoming).await?;
        let message = build_message(&text, &persisted);

        self.bridge.ensure_session_started();

        let delivery = self.queue.enqueue(message).await?;
        tracing::debug!(
            attachments = persisted.len(),
            has_text = !text.is_empty(),
            "message queued"
        );

        Ok(Accepted {
            attachments: persisted,
            delivery,
        })
    }
}
