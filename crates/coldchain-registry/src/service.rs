//! # Registry Engine
//!
//! Validates and applies requests against the ledger, keeping the contract
//! index and event counter in step with every mutation.
//!
//! ## Request Flow
//!
//! ```text
//! RegistryApi::dispatch ──→ Operation::from_name
//!        │
//!        ├─ init ────────────────→ initialize_ledger
//!        ├─ init_contract_terms ─→ create_contract_terms ─→ ContractIndex / EventSequencer
//!        └─ (other) ─────────────→ EventSequencer ─→ UnknownOperation
//!
//! RegistryApi::query ────→ QueryOperation::from_name ─→ query_key
//! ```
//!
//! ## Failure Model
//!
//! Validation happens before the first write. Once writing starts there is no
//! rollback: a ledger failure after the record write but before the index
//! append leaves the record outside the index, and the caller gets `Io`.

use crate::dispatch::{Operation, QueryOperation};
use crate::domain::codec::{decode_terms, encode_integer, encode_terms};
use crate::domain::entities::{Notification, NotificationSource};
use crate::domain::keys::{is_reserved, BOOTSTRAP_KEY, EVENT_CHANNEL};
use crate::domain::validation::{
    contract_terms_from_args, initial_holding_from_args, single_key_from_args,
};
use crate::errors::{ErrorKind, RegistryError};
use crate::ledger::{ContractIndex, EventSequencer, StateAccessor};
use crate::ports::inbound::{Payload, RegistryApi};
use crate::ports::outbound::{EventSink, LedgerStore};
use tracing::{debug, error, info, instrument, warn};

/// The registry engine.
///
/// Holds its collaborators and nothing else: every value it works with is read
/// from the ledger during the request that needs it, so the engine can be
/// re-run against any ledger state.
pub struct RegistryEngine<L: LedgerStore, E: EventSink> {
    ledger: L,
    events: E,
    index: ContractIndex,
    sequencer: EventSequencer,
}

impl<L: LedgerStore, E: EventSink> RegistryEngine<L, E> {
    /// Create an engine over a ledger and a notification sink.
    pub fn new(ledger: L, events: E) -> Self {
        Self {
            ledger,
            events,
            index: ContractIndex::new(),
            sequencer: EventSequencer::new(),
        }
    }

    /// The ledger this engine writes to.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The notification sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    fn state(&self) -> StateAccessor<'_, L> {
        StateAccessor::new(&self.ledger)
    }

    // =========================================================================
    // HANDLERS
    // =========================================================================

    /// Bootstrap or reset: `[initial_holding]`.
    ///
    /// Writes the holding under `abc`, empties the contract index and sets the
    /// event counter to 1. Other keys, including contract records, are kept.
    pub fn initialize_ledger<S: AsRef<str>>(&self, args: &[S]) -> Result<Payload, RegistryError> {
        let holding = initial_holding_from_args(args)?;

        let state = self.state();
        state.put(BOOTSTRAP_KEY, &encode_integer(holding))?;
        self.index.reset(&state)?;
        self.sequencer.reset(&state)?;

        info!(initial_holding = holding, "ledger initialized");
        Ok(Payload::new())
    }

    /// Create contract terms: `[product_type, max_temperature_f]`.
    pub fn create_contract_terms<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<Payload, RegistryError> {
        let terms = contract_terms_from_args(args)?;
        let state = self.state();
        if is_reserved(&terms.product_type) {
            warn!(product_type = %terms.product_type, "product type shadows a reserved key");
        }

        let existing = state
            .get(&terms.product_type)?
            .as_deref()
            .and_then(decode_terms);
        if let Some(existing) = existing {
            if existing.product_type == terms.product_type {
                return Err(RegistryError::DuplicateContract {
                    product_type: terms.product_type,
                });
            }
        }

        state.put(&terms.product_type, &encode_terms(&terms)?)?;
        let indexed = self.index.append(&state, &terms.product_type)?;
        let counter = self.sequencer.next(&state)?;
        self.notify(Notification::new(NotificationSource::ContractTerms, counter));

        info!(
            product_type = %terms.product_type,
            max_temperature_f = terms.max_temperature_f,
            contracts = indexed,
            counter,
            "contract terms created"
        );
        Ok(Payload::new())
    }

    /// Remove a key unconditionally: `[key]`.
    ///
    /// No existence check and no index maintenance, even when the key is a
    /// contract's product type.
    pub fn delete_key<S: AsRef<str>>(&self, args: &[S]) -> Result<Payload, RegistryError> {
        let key = single_key_from_args(args)?;
        if is_reserved(key) {
            warn!(key, "deleting a reserved key");
        }
        self.state().delete(key)?;
        debug!(key, "key deleted");
        Ok(Payload::new())
    }

    /// Raw bytes stored under a key: `[key]`.
    pub fn query_key<S: AsRef<str>>(&self, args: &[S]) -> Result<Payload, RegistryError> {
        let key = single_key_from_args(args)?;
        self.state()
            .get(key)?
            .ok_or_else(|| RegistryError::NotFound {
                key: key.to_string(),
            })
    }

    /// Every product type in the contract index, in creation order.
    pub fn list_contracts(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.index.load(&self.state())?)
    }

    /// Value the next counted request will be labelled with.
    pub fn event_counter(&self) -> Result<u64, RegistryError> {
        Ok(self.sequencer.current(&self.state())?)
    }

    fn reject_unrouted(&self, name: &str) -> RegistryError {
        match self.sequencer.next(&self.state()) {
            Ok(counter) => {
                self.notify(Notification::new(NotificationSource::UnroutedInvoke, counter));
                RegistryError::UnknownOperation {
                    name: name.to_string(),
                }
            }
            Err(e) => e.into(),
        }
    }

    fn notify(&self, notification: Notification) {
        if let Err(e) = self.events.emit(EVENT_CHANNEL, &notification.payload()) {
            warn!(
                error = %e,
                counter = notification.counter,
                "notification not delivered"
            );
        }
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

impl<L: LedgerStore, E: EventSink> RegistryApi for RegistryEngine<L, E> {
    #[instrument(skip_all, fields(operation = "init"))]
    fn initialize(&self, args: &[String]) -> Result<Payload, RegistryError> {
        observe(self.initialize_ledger(args))
    }

    #[instrument(skip(self, args), fields(arg_count = args.len()))]
    fn dispatch(&self, operation: &str, args: &[String]) -> Result<Payload, RegistryError> {
        let result = match Operation::from_name(operation) {
            Operation::Initialize => self.initialize_ledger(args),
            Operation::CreateContractTerms => self.create_contract_terms(args),
            Operation::Unrouted(name) => Err(self.reject_unrouted(name)),
        };
        observe(result)
    }

    #[instrument(skip(self, args), fields(arg_count = args.len()))]
    fn query(&self, operation: &str, args: &[String]) -> Result<Payload, RegistryError> {
        let result = match QueryOperation::from_name(operation) {
            QueryOperation::QueryKey => self.query_key(args),
            QueryOperation::Unrouted(name) => Err(RegistryError::UnknownOperation {
                name: name.to_string(),
            }),
        };
        observe(result)
    }
}

/// Log a request outcome at the level its kind deserves.
fn observe(result: Result<Payload, RegistryError>) -> Result<Payload, RegistryError> {
    if let Err(err) = &result {
        match err.kind() {
            ErrorKind::IoFailure => error!(error = %err, "request failed"),
            ErrorKind::DuplicateContract | ErrorKind::UnknownOperation => {
                warn!(kind = %err.kind(), error = %err, "request rejected");
            }
            _ => debug!(kind = %err.kind(), error = %err, "request rejected"),
        }
    }
    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedger, RecordingEventSink};
    use crate::domain::keys::{CONTRACT_INDEX_KEY, EVENT_COUNTER_KEY};
    use crate::errors::{LedgerError, NotifyError};

    fn engine() -> RegistryEngine<InMemoryLedger, RecordingEventSink> {
        RegistryEngine::new(InMemoryLedger::new(), RecordingEventSink::new())
    }

    fn raw(engine: &RegistryEngine<InMemoryLedger, RecordingEventSink>, key: &str) -> Option<Vec<u8>> {
        engine.ledger().get(key.as_bytes()).unwrap()
    }

    struct RefusingSink;

    impl EventSink for RefusingSink {
        fn emit(&self, _channel: &str, _payload: &[u8]) -> Result<(), NotifyError> {
            Err(NotifyError::Unavailable("down".to_string()))
        }
    }

    #[test]
    fn test_initialize_writes_bootstrap_state() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        assert_eq!(raw(&engine, BOOTSTRAP_KEY), Some(b"100".to_vec()));
        assert_eq!(raw(&engine, CONTRACT_INDEX_KEY), Some(b"[]".to_vec()));
        assert_eq!(raw(&engine, EVENT_COUNTER_KEY), Some(b"1".to_vec()));
        assert!(engine.events().events().is_empty());
    }

    #[test]
    fn test_initialize_keeps_other_keys() {
        let engine = engine();
        engine.initialize_ledger(&["1"]).unwrap();
        engine.create_contract_terms(&["meat", "35"]).unwrap();

        engine.initialize_ledger(&["2"]).unwrap();
        assert!(raw(&engine, "meat").is_some());
        assert!(engine.list_contracts().unwrap().is_empty());
    }

    #[test]
    fn test_create_writes_record_index_and_counter() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();
        engine.create_contract_terms(&["perishable", "40"]).unwrap();

        assert_eq!(
            raw(&engine, "perishable"),
            Some(br#"{"product_type":"perishable","max_temperature_f":40}"#.to_vec())
        );
        assert_eq!(engine.list_contracts().unwrap(), vec!["perishable"]);
        assert_eq!(engine.event_counter().unwrap(), 2);

        let events = engine.events().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].channel, "evtsender");
        assert_eq!(events[0].payload_text(), "init_terms Event Counter is 1");
    }

    #[test]
    fn test_duplicate_rejected_without_side_effects() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();
        engine.create_contract_terms(&["perishable", "40"]).unwrap();

        let err = engine.create_contract_terms(&["perishable", "50"]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateContract {
                product_type: "perishable".to_string()
            }
        );
        // Record, index and counter unchanged
        assert!(String::from_utf8(raw(&engine, "perishable").unwrap())
            .unwrap()
            .contains("40"));
        assert_eq!(engine.list_contracts().unwrap(), vec!["perishable"]);
        assert_eq!(engine.event_counter().unwrap(), 2);
        assert_eq!(engine.events().events().len(), 1);
    }

    #[test]
    fn test_create_over_foreign_value() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        // `abc` holds a bare number, not contract terms
        engine.create_contract_terms(&["abc", "10"]).unwrap();
        assert_eq!(engine.list_contracts().unwrap(), vec!["abc"]);
        assert!(engine.create_contract_terms(&["abc", "11"]).is_err());
    }

    #[test]
    fn test_validation_failures_touch_nothing() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        for args in [vec!["", ""], vec!["meat", ""], vec!["meat", "cold"], vec!["meat"]] {
            let err = engine.create_contract_terms(&args).unwrap_err();
            assert!(err.is_validation(), "{err}");
        }
        assert_eq!(engine.event_counter().unwrap(), 1);
        assert!(engine.list_contracts().unwrap().is_empty());
        assert!(raw(&engine, "meat").is_none());
    }

    #[test]
    fn test_delete_and_query() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        assert_eq!(engine.query_key(&["abc"]).unwrap(), b"100".to_vec());
        engine.delete_key(&["abc"]).unwrap();
        assert_eq!(
            engine.query_key(&["abc"]).unwrap_err(),
            RegistryError::NotFound {
                key: "abc".to_string()
            }
        );
        // Deleting an absent key succeeds
        engine.delete_key(&["abc"]).unwrap();
        assert!(matches!(
            engine.delete_key(&["a", "b"]),
            Err(RegistryError::Arity { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_delete_leaves_index_entry() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();
        engine.create_contract_terms(&["meat", "35"]).unwrap();
        engine.delete_key(&["meat"]).unwrap();

        assert_eq!(engine.list_contracts().unwrap(), vec!["meat"]);
        // The product type can now be created again
        engine.create_contract_terms(&["meat", "30"]).unwrap();
        assert_eq!(engine.list_contracts().unwrap(), vec!["meat", "meat"]);
    }

    #[test]
    fn test_unrouted_dispatch_advances_counter() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        let err = engine.dispatch("bogus", &[]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownOperation {
                name: "bogus".to_string()
            }
        );
        assert_eq!(engine.event_counter().unwrap(), 2);
        assert_eq!(
            engine.events().payloads(),
            vec!["Invoke() Event Counter is 1"]
        );
    }

    #[test]
    fn test_unknown_query_leaves_counter() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        let err = engine.query("read", &["abc".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOperation);
        assert_eq!(engine.event_counter().unwrap(), 1);
        assert!(engine.events().events().is_empty());
    }

    #[test]
    fn test_index_write_failure_leaves_orphan_record() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();
        engine.ledger().fail_writes_to(CONTRACT_INDEX_KEY);

        let err = engine.create_contract_terms(&["dairy", "38"]).unwrap_err();
        assert!(matches!(err, RegistryError::Io(LedgerError::Io { .. })));

        // Record landed, index and counter did not
        assert!(raw(&engine, "dairy").is_some());
        assert!(engine.list_contracts().unwrap().is_empty());
        assert_eq!(engine.event_counter().unwrap(), 1);
        assert!(engine.events().events().is_empty());
    }

    #[test]
    fn test_counter_write_failure_on_unrouted() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();
        engine.ledger().fail_writes_to(EVENT_COUNTER_KEY);

        let err = engine.dispatch("bogus", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(engine.events().events().is_empty());
    }

    #[test]
    fn test_contract_over_index_key_breaks_listing_until_init() {
        let engine = engine();
        engine.initialize_ledger(&["100"]).unwrap();

        let err = engine.create_contract_terms(&[CONTRACT_INDEX_KEY, "5"]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Io(LedgerError::Corrupted { ref key, .. }) if key == CONTRACT_INDEX_KEY
        ));
        assert_eq!(engine.event_counter().unwrap(), 1);

        assert!(matches!(
            engine.create_contract_terms(&["meat", "5"]),
            Err(RegistryError::Io(LedgerError::Corrupted { .. }))
        ));
        assert!(engine.list_contracts().is_err());

        engine.initialize_ledger(&["100"]).unwrap();
        assert!(engine.list_contracts().unwrap().is_empty());
    }

    #[test]
    fn test_sink_failure_does_not_fail_request() {
        let engine = RegistryEngine::new(InMemoryLedger::new(), RefusingSink);
        engine.initialize_ledger(&["100"]).unwrap();

        engine.create_contract_terms(&["meat", "35"]).unwrap();
        assert_eq!(engine.list_contracts().unwrap(), vec!["meat"]);
        assert_eq!(engine.event_counter().unwrap(), 2);
    }
}
