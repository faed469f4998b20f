//! # Broadcast Event Sink
//!
//! Notification channel backed by `tokio::sync::broadcast`. Sending is
//! synchronous, so the engine needs no runtime; subscribers drain their
//! receivers whenever they like.

use crate::domain::entities::EmittedEvent;
use crate::errors::NotifyError;
use crate::ports::outbound::EventSink;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Multi-subscriber notification queue.
pub struct BroadcastEventSink {
    sender: broadcast::Sender<EmittedEvent>,
    events_published: AtomicU64,
}

impl BroadcastEventSink {
    /// Create a sink with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a sink buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Subscribe to every event emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EmittedEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events attempted, delivered or not.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, channel: &str, payload: &[u8]) -> Result<(), NotifyError> {
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let event = EmittedEvent {
            channel: channel.to_string(),
            payload: payload.to_vec(),
        };
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(channel, receivers, "event published");
                Ok(())
            }
            Err(_) => Err(NotifyError::NoSubscribers {
                channel: channel.to_string(),
            }),
        }
    }
}

/// Drain every event currently buffered in `receiver`.
///
/// Lagged receivers skip what they missed and keep draining.
pub fn drain(receiver: &mut broadcast::Receiver<EmittedEvent>) -> Vec<EmittedEvent> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "event receiver lagged");
            }
            Err(_) => break,
        }
    }
    events
}
