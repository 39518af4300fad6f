// ABOUTME: FIFO message queue between the send coordinator and the session consumer.
// ABOUTME: A single mpsc channel is the only ordering point; each entry carries a completion signal.

use tokio::sync::{mpsc, oneshot};

use crate::error::IntakeError;
use crate::message::OutgoingMessage;

/// A queued message plus the signal fired when the session takes it.
#[derive(Debug)]
pub struct QueueEntry {
    pub message: OutgoingMessage,
    completion: oneshot::Sender<()>,
}

impl QueueEntry {
    /// Mark the entry consumed and hand back its message.
    pub fn complete(self) -> OutgoingMessage {
        // The producer may have stopped waiting; that is fine.
        let _ = self.completion.send(());
        self.message
    }
}

/// Resolves once the session has consumed the corresponding entry.
#[derive(Debug)]
pub struct Delivery {
    rx: oneshot::Receiver<()>,
}

impl Delivery {
    /// Wait for consumption. Returns `false` if the entry was dropped unconsumed.
    pub async fn consumed(self) -> bool {
        self.rx.await.is_ok()
    }
}

/// Producer side of the queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    tx: mpsc::Sender<QueueEntry>,
}

impl MessageQueue {
    /// Append a message. Returns once the entry has been accepted onto the queue.
    pub async fn enqueue(&self, message: OutgoingMessage) -> Result<Delivery, IntakeError> {
        let (completion, rx) = oneshot::channel();
        self.tx
            .send(QueueEntry {
                message,
                completion,
            })
            .await
            .map_err(|_| IntakeError::QueueClosed)?;
        Ok(Delivery { rx })
    }

    /// Whether the consumer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the queue. There is exactly one.
#[derive(Debug)]
pub struct QueueReceiver {
    rx: mpsc::Receiver<QueueEntry>,
}

impl QueueReceiver {
    /// Next entry in submission order, or `None` once every producer is gone.
    pub async fn recv(&mut self) -> Option<QueueEntry> {
        self.rx.recv().await
    }

    /// Number of entries waiting to be consumed.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a bounded queue. A full queue makes `enqueue` wait for room.
pub fn message_queue(capacity: usize) -> (MessageQueue, QueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (MessageQueue { tx }, QueueReceiver { rx })
}
