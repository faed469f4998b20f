//! # Cold-Chain Contract Registry
//!
//! Ledger-backed registry of cold-chain contract terms (product type plus
//! maximum temperature). Runs as a state-transition handler: the host invokes
//! one entry point per request against an external key/value ledger, and the
//! engine reads, validates, writes and returns without keeping anything in
//! memory between requests.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | State Accessor | `ledger/accessor.rs` | String-keyed get/put/delete over the ledger |
//! | Contract Index | `ledger/index.rs` | Ordered list of created product types |
//! | Event Sequencer | `ledger/sequencer.rs` | Monotonic counter labelling notifications |
//! | Registry Engine | `service.rs` | Validation, uniqueness, index/counter upkeep |
//! | Dispatcher | `dispatch.rs` | Operation name → handler |
//!
//! ## Reserved Ledger Keys
//!
//! | Key | Encoding |
//! |-----|----------|
//! | `_contractindex` | JSON array of product types |
//! | `event_counter` | decimal string |
//! | `abc` | decimal string written by initialize |
//!
//! Generic keys share the same namespace; callers must not write the reserved ones.
//!
//! ## Concurrency
//!
//! The host must serialize requests touching the same keys. The engine does no
//! locking, no optimistic checks and no retries.
//!
//! ## Usage Example
//!
//! ```
//! use coldchain_registry::prelude::*;
//!
//! let engine = RegistryEngine::new(InMemoryLedger::new(), RecordingEventSink::new());
//! engine.initialize(&["100".to_string()]).unwrap();
//! engine
//!     .dispatch("init_contract_terms", &["perishable".to_string(), "40".to_string()])
//!     .unwrap();
//!
//! assert_eq!(engine.list_contracts().unwrap(), vec!["perishable"]);
//! assert_eq!(engine.events().payloads(), vec!["init_terms Event Counter is 1"]);
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{
        ContractTerms, EmittedEvent, Notification, NotificationSource, Shipment,
    };
    pub use crate::domain::keys::{
        BOOTSTRAP_KEY, CONTRACT_INDEX_KEY, EVENT_CHANNEL, EVENT_COUNTER_KEY,
    };

    // Errors
    pub use crate::errors::{ErrorKind, LedgerError, NotifyError, RegistryError};

    // Ports
    pub use crate::ports::inbound::{Payload, RegistryApi};
    pub use crate::ports::outbound::{EventSink, LedgerStore};

    // Components
    pub use crate::dispatch::{Operation, QueryOperation};
    pub use crate::ledger::{ContractIndex, EventSequencer, StateAccessor};
    pub use crate::service::RegistryEngine;

    // Adapters
    pub use crate::adapters::{
        BroadcastEventSink, FileBackedLedger, InMemoryLedger, RecordingEventSink,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_exports() {
        let engine = RegistryEngine::new(InMemoryLedger::new(), BroadcastEventSink::new());
        assert_eq!(engine.event_counter().unwrap(), 1);
        assert_eq!(EVENT_CHANNEL, "evtsender");
    }
}
