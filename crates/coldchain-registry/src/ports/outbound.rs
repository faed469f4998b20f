//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on. The host supplies implementations:
//! - the key/value ledger the engine reads and writes
//! - the notification channel events are emitted on
//!
//! Production: `FileBackedLedger`, `BroadcastEventSink` (adapters/)
//! Testing: `InMemoryLedger`, `RecordingEventSink` (adapters/)

use crate::errors::{LedgerError, NotifyError};
use std::sync::Arc;

// =============================================================================
// LEDGER
// =============================================================================

/// Abstract interface over the external key/value ledger.
///
/// Calls are synchronous and a successful return means the write is durable.
/// The host guarantees that no other request mutates the same keys while one
/// request is running; implementations need no transaction support.
pub trait LedgerStore: Send + Sync {
    /// Get a value by key. `None` if the key was never written or was deleted.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store a value, replacing any previous one.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), LedgerError>;

    /// Remove a key. Removing an absent key succeeds.
    fn delete(&self, key: &[u8]) -> Result<(), LedgerError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), LedgerError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), LedgerError> {
        (**self).delete(key)
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Outbound notification channel.
///
/// Fire-and-forget: the engine reports a failed emission in its logs but the
/// request outcome does not change.
pub trait EventSink: Send + Sync {
    /// Emit `payload` on the named channel.
    fn emit(&self, channel: &str, payload: &[u8]) -> Result<(), NotifyError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, channel: &str, payload: &[u8]) -> Result<(), NotifyError> {
        (**self).emit(channel, payload)
    }
}
