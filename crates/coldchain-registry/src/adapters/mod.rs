//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete ledgers and notification sinks implementing the outbound ports.

pub mod event_bus;
pub mod file_ledger;
pub mod memory_ledger;
pub mod recording_sink;

pub use event_bus::{drain, BroadcastEventSink, DEFAULT_EVENT_CAPACITY};
pub use file_ledger::FileBackedLedger;
pub use memory_ledger::InMemoryLedger;
pub use recording_sink::RecordingEventSink;
