//! Status events: transient progress messages for the end user's UI.
//!
//! Events are sent into a [`StatusChannel`], which buffers them until
//! flushed. Hosts that only deliver output at a response boundary behave
//! the same way, so callers that need an event seen *now* must flush.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// A progress or announcement message for the status sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub in_progress: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<bool>,
}

impl StatusEvent {
    pub fn new(in_progress: bool) -> Self {
        Self {
            in_progress,
            message: None,
            icon: None,
            sticky: None,
        }
    }

    /// An in-progress event carrying `message`.
    pub fn progress(message: impl Into<String>) -> Self {
        Self::new(true).with_message(message)
    }

    /// The bare `{inProgress: false}` event that closes a progress indicator.
    pub fn done() -> Self {
        Self::new(false)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = Some(sticky);
        self
    }
}

/// Buffered, ordered output channel for status events.
pub struct StatusChannel {
    pending: Mutex<Vec<StatusEvent>>,
    sender: mpsc::UnboundedSender<StatusEvent>,
}

/// Create a status channel and the receiver its flushed events arrive on.
pub fn status_channel() -> (StatusChannel, mpsc::UnboundedReceiver<StatusEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let channel = StatusChannel {
        pending: Mutex::new(Vec::new()),
        sender,
    };
    (channel, receiver)
}

impl StatusChannel {
    /// Queue an event. It is delivered on the next [`flush`](Self::flush).
    pub fn send(&self, event: StatusEvent) {
        self.lock_pending().push(event);
    }

    /// Deliver every queued event, in send order.
    pub fn flush(&self) {
        let drained: Vec<StatusEvent> = self.lock_pending().drain(..).collect();
        for event in drained {
            // A dropped receiver just means nobody is watching.
            if self.sender.send(event).is_err() {
                tracing::trace!("Status receiver closed, discarding event");
            }
        }
    }

    /// Number of events queued but not yet delivered.
    pub fn pending(&self) -> usize {
        self.lock_pending().len()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<StatusEvent>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for StatusChannel {
    fn drop(&mut self) {
        self.flush();
    }
}
