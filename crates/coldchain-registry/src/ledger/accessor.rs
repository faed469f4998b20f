//! # State Accessor
//!
//! String-keyed get/put/delete over a [`LedgerStore`]. Bytes pass through
//! untouched; callers encode and decode. Ledger failures are returned as-is,
//! without retry.

use crate::errors::LedgerError;
use crate::ports::outbound::LedgerStore;
use tracing::trace;

/// Borrowed view of the ledger for the duration of one request.
pub struct StateAccessor<'a, L: LedgerStore + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerStore + ?Sized> StateAccessor<'a, L> {
    /// Wrap a ledger.
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Read the value under `key`.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let value = self.ledger.get(key.as_bytes())?;
        trace!(key, found = value.is_some(), "ledger get");
        Ok(value)
    }

    /// Write `value` under `key`.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        trace!(key, len = value.len(), "ledger put");
        self.ledger.put(key.as_bytes(), value)
    }

    /// Remove `key`.
    pub fn delete(&self, key: &str) -> Result<(), LedgerError> {
        trace!(key, "ledger delete");
        self.ledger.delete(key.as_bytes())
    }
}

impl<L: LedgerStore + ?Sized> Clone for StateAccessor<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: LedgerStore + ?Sized> Copy for StateAccessor<'_, L> {}
