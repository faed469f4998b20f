//! # Event Sequencer
//!
//! Monotonic counter stored under `event_counter`, used to label notifications.
//! Only requests that reach [`EventSequencer::next`] advance it; requests
//! rejected earlier leave it untouched.

use crate::domain::codec::{decode_counter, encode_counter};
use crate::domain::keys::{EVENT_COUNTER_KEY, INITIAL_EVENT_COUNTER};
use crate::errors::LedgerError;
use crate::ledger::accessor::StateAccessor;
use crate::ports::outbound::LedgerStore;
use tracing::trace;

/// Sequencer component. Holds only the key name.
#[derive(Debug, Clone, Copy)]
pub struct EventSequencer {
    key: &'static str,
}

impl Default for EventSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSequencer {
    /// Sequencer stored under the reserved `event_counter` key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: EVENT_COUNTER_KEY,
        }
    }

    /// Current value without advancing. An absent counter reads as 1.
    pub fn current<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
    ) -> Result<u64, LedgerError> {
        match state.get(self.key)? {
            Some(bytes) => decode_counter(&bytes),
            None => Ok(INITIAL_EVENT_COUNTER),
        }
    }

    /// Advance by one and return the value before the increment.
    pub fn next<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
    ) -> Result<u64, LedgerError> {
        let current = self.current(state)?;
        let advanced = current
            .checked_add(1)
            .ok_or_else(|| LedgerError::corrupted(self.key, "event counter overflow"))?;
        state.put(self.key, &encode_counter(advanced))?;
        trace!(counter = current, "event counter advanced");
        Ok(current)
    }

    /// Set the counter back to 1.
    pub fn reset<L: LedgerStore + ?Sized>(
        &self,
        state: &StateAccessor<'_, L>,
    ) -> Result<(), LedgerError> {
        state.put(self.key, &encode_counter(INITIAL_EVENT_COUNTER))
    }
}
