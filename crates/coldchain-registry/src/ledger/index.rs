//! # Contract Index
//!
//! Ordered, append-only list of product types stored under one reserved key.
//!
//! The index does not de-duplicate; the engine checks uniqueness before
//! appending. It can also name a product type whose record was later removed
//! through the generic delete path, so treat it as an enumeration aid rather
//! than a foreign key.

use crate::domain::codec::{decode_index, encode_index};
use crate::domain::keys::CONTRACT_INDEX_KEY;
use crate::errors::LedgerError;
use crate::ledger::accessor::StateAccessor;
use crate::ports::outbound::LedgerStore;
use tracing::debug;

/// Index component. Holds only the key name; entries always come from the ledger.
#[derive(Debug, Clone, Copy)]
pub struct ContractIndex {
    key: &'static str,
}

impl Default for ContractIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractIndex {
    /// Index stored under the reserved `_contractindex` key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: CONTRACT_INDEX_KEY,
        }
    }

    /// All known product types, in creation order.
    pub fn load<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
    ) -> Result<Vec<String>, LedgerError> {
        match state.get(self.key)? {
            Some(bytes) => decode_index(&bytes),
            None => Ok(Vec::new()),
        }
    }

    /// Append a product type and write the index back.
    ///
    /// Read-modify-write: two concurrent appends would lose one entry unless the
    /// host serializes requests.
    pub fn append<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
        product_type: &str,
    ) -> Result<usize, LedgerError> {
        let mut entries = self.load(state)?;
        entries.push(product_type.to_string());
        state.put(self.key, &encode_index(&entries)?)?;
        debug!(product_type, entries = entries.len(), "contract index appended");
        Ok(entries.len())
    }

    /// Replace the index with an empty one.
    pub fn reset<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
    ) -> Result<(), LedgerError> {
        state.put(self.key, &encode_index(&[])?)
    }
}
