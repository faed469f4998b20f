//! # Recording Event Sink
//!
//! Keeps every emitted event in memory. Used by tests and replay runs to
//! inspect exactly what a request emitted.

use crate::domain::entities::EmittedEvent;
use crate::errors::NotifyError;
use crate::ports::outbound::EventSink;
use std::sync::RwLock;

/// In-memory implementation of `EventSink`.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: RwLock<Vec<EmittedEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Payloads of the events emitted so far, as text.
    pub fn payloads(&self) -> Vec<String> {
        self.events()
            .iter()
            .map(EmittedEvent::payload_text)
            .collect()
    }

    /// Remove and return everything recorded.
    pub fn take(&self) -> Vec<EmittedEvent> {
        self.events
            .write()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, channel: &str, payload: &[u8]) -> Result<(), NotifyError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| NotifyError::Unavailable("recorder lock poisoned".to_string()))?;
        events.push(EmittedEvent {
            channel: channel.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let sink = RecordingEventSink::new();
        sink.emit("evtsender", b"one").unwrap();
        sink.emit("evtsender", b"two").unwrap();

        assert_eq!(sink.payloads(), vec!["one", "two"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }
}
