// ABOUTME: Session module — the service contract, FIFO queue, orchestration bridge, and local runtime.
// ABOUTME: Also persists transcripts and the model preference for the local runtime.

pub mod bridge;
pub mod local;
pub mod log;
pub mod preferences;
pub mod queue;
pub mod service;

pub use bridge::{NOTHING_TO_INTERRUPT, SessionBridge};
pub use local::{LocalSession, LocalSessionParams, SessionEvent};
pub use log::{SessionLogger, read_transcript, workspace_hash};
pub use preferences::PreferenceStore;
pub use queue::{Delivery, MessageQueue, QueueEntry, QueueReceiver, message_queue};
pub use service::{ModelPreference, SessionService, WindowHandle};
