//! # In-Memory Ledger
//!
//! `LedgerStore` over a hash map, for tests and ephemeral runs.

use crate::errors::LedgerError;
use crate::ports::outbound::LedgerStore;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// In-memory implementation of `LedgerStore`.
///
/// Writes to keys registered with [`InMemoryLedger::fail_writes_to`] fail with
/// an I/O error, which lets tests exercise partial-failure paths.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    failing_keys: RwLock<HashSet<Vec<u8>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later put or delete of `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        if let Ok(mut failing) = self.failing_keys.write() {
            failing.insert(key.as_bytes().to_vec());
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().map(|data| data.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self, key: &[u8]) -> Result<(), LedgerError> {
        let failing = self
            .failing_keys
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        if failing.contains(key) {
            return Err(LedgerError::Io {
                message: format!("injected write failure for {:?}", String::from_utf8_lossy(key)),
            });
        }
        Ok(())
    }
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        let data = self.data.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), LedgerError> {
        self.check_writable(key)?;
        let mut data = self.data.write().map_err(|_| LedgerError::LockPoisoned)?;
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), LedgerError> {
        self.check_writable(key)?;
        let mut data = self.data.write().map_err(|_| LedgerError::LockPoisoned)?;
        data.remove(key);
        Ok(())
    }
}
