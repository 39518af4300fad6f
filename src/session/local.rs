// ABOUTME: LocalSession — in-process SessionService that drains the message queue in order.
// ABOUTME: Records each consumed message to a transcript and holds an interruptible response open.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::log::SessionLogger;
use super::preferences::PreferenceStore;
use super::queue::QueueReceiver;
use super::service::{ModelPreference, SessionService, WindowHandle};
use crate::message::OutgoingMessage;

/// Lifecycle notifications emitted by the local session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The consumer task is running.
    Started,
    /// A queued message was taken off the queue.
    MessageReceived { blocks: usize },
    /// The response to the last message finished.
    ResponseDone,
    /// The response to the last message was cut short.
    ResponseInterrupted,
    /// The conversation was reset.
    Reset { resume_session_id: Option<String> },
    /// Every producer is gone; the consumer exited.
    Stopped,
}

/// Construction parameters for [`LocalSession`].
pub struct LocalSessionParams {
    pub preferences: PreferenceStore,
    /// Used when no preference has been stored yet.
    pub default_preference: ModelPreference,
    pub transcript: Option<SessionLogger>,
    /// How long each response stays open (and interruptible).
    pub response_hold: Duration,
    pub events: Option<mpsc::Sender<SessionEvent>>,
}

struct Inner {
    receiver: Mutex<Option<QueueReceiver>>,
    active: AtomicBool,
    in_flight: Mutex<Option<oneshot::Sender<()>>>,
    preference: Mutex<ModelPreference>,
    preferences: PreferenceStore,
    transcript: Option<Mutex<SessionLogger>>,
    resume_session_id: Mutex<Option<String>>,
    response_hold: Duration,
    events: Option<mpsc::Sender<SessionEvent>>,
}

/// Lock a std mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Inner {
    async fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }

    fn record(&self, message: &OutgoingMessage) {
        if let Some(transcript) = &self.transcript {
            if let Err(e) = lock(transcript).log_message(message) {
                tracing::warn!("failed to write session transcript: {:#}", e);
            }
        }
    }

    /// Cancel the in-flight response, if any. Returns whether one existed.
    fn cancel_in_flight(&self) -> bool {
        match lock(&self.in_flight).take() {
            Some(cancel) => {
                let _ = cancel.send(());
                true
            }
            None => false,
        }
    }

    async fn respond(&self) {
        if self.response_hold.is_zero() {
            self.emit(SessionEvent::ResponseDone).await;
            return;
        }

        let (cancel, cancelled) = oneshot::channel();
        *lock(&self.in_flight) = Some(cancel);

        let event = tokio::select! {
            _ = tokio::time::sleep(self.response_hold) => SessionEvent::ResponseDone,
            _ = cancelled => SessionEvent::ResponseInterrupted,
        };
        lock(&self.in_flight).take();
        self.emit(event).await;
    }
}

/// Reference session runtime owning the single queue consumer.
#[derive(Clone)]
pub struct LocalSession {
    inner: Arc<Inner>,
}

impl LocalSession {
    pub fn new(receiver: QueueReceiver, params: LocalSessionParams) -> Self {
        let preference = match params.preferences.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => params.default_preference,
            Err(e) => {
                tracing::warn!(
                    path = %params.preferences.path().display(),
                    "failed to load model preference, using default: {:#}",
                    e
                );
                params.default_preference
            }
        };

        Self {
            inner: Arc::new(Inner {
                receiver: Mutex::new(Some(receiver)),
                active: AtomicBool::new(false),
                in_flight: Mutex::new(None),
                preference: Mutex::new(preference),
                preferences: params.preferences,
                transcript: params.transcript.map(Mutex::new),
                resume_session_id: Mutex::new(None),
                response_hold: params.response_hold,
                events: params.events,
            }),
        }
    }

    /// Whether a response is currently open.
    pub fn is_responding(&self) -> bool {
        lock(&self.inner.in_flight).is_some()
    }

    /// Session id requested by the most recent reset, if any.
    pub fn resume_session_id(&self) -> Option<String> {
        lock(&self.inner.resume_session_id).clone()
    }
}

async fn run_consumer(inner: Arc<Inner>, mut receiver: QueueReceiver) {
    inner.emit(SessionEvent::Started).await;

    while let Some(entry) = receiver.recv().await {
        // Transcript first, so a resolved delivery implies the line is on disk.
        inner.record(&entry.message);
        let message = entry.complete();
        tracing::debug!(blocks = message.content.len(), "session consumed message");
        inner
            .emit(SessionEvent::MessageReceived {
                blocks: message.content.len(),
            })
            .await;
        inner.respond().await;
    }

    inner.active.store(false, Ordering::SeqCst);
    tracing::info!("message queue closed, session stopped");
    inner.emit(SessionEvent::Stopped).await;
}

#[async_trait]
impl SessionService for LocalSession {
    fn is_session_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    async fn start_streaming_session(&self, window: &WindowHandle) -> anyhow::Result<()> {
        if self.inner.active.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let Some(receiver) = lock(&self.inner.receiver).take() else {
            self.inner.active.store(false, Ordering::SeqCst);
            anyhow::bail!("session queue has already been drained; cannot start a new session");
        };

        tracing::info!(window = window.label(), "starting local session");
        tokio::spawn(run_consumer(Arc::clone(&self.inner), receiver));
        Ok(())
    }

    async fn interrupt_current_response(&self, _window: &WindowHandle) -> anyhow::Result<bool> {
        Ok(self.inner.cancel_in_flight())
    }

    async fn reset_session(&self, resume_session_id: Option<String>) -> anyhow::Result<()> {
        if let Some(transcript) = &self.inner.transcript {
            lock(transcript).rotate()?;
        }
        self.inner.cancel_in_flight();
        *lock(&self.inner.resume_session_id) = resume_session_id.clone();
        tracing::info!(resume = ?resume_session_id, "session reset");
        self.inner
            .emit(SessionEvent::Reset { resume_session_id })
            .await;
        Ok(())
    }

    fn current_model_preference(&self) -> ModelPreference {
        *lock(&self.inner.preference)
    }

    async fn set_model_preference(&self, preference: ModelPreference) -> anyhow::Result<()> {
        let store = self.inner.preferences.clone();
        tokio::task::spawn_blocking(move || store.save(preference)).await??;
        *lock(&self.inner.preference) = preference;
        Ok(())
    }
}
