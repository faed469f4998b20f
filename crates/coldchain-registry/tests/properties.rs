//! # Registry Properties
//!
//! Property tests over generated request sequences.

use coldchain_registry::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn engine() -> RegistryEngine<InMemoryLedger, RecordingEventSink> {
    let engine = RegistryEngine::new(InMemoryLedger::new(), RecordingEventSink::new());
    engine.initialize(&["100".to_string()]).unwrap();
    engine
}

/// A request as the host would send it.
#[derive(Debug, Clone)]
enum Request {
    Create(String, String),
    Unrouted(String),
    Query(String),
}

fn request() -> impl Strategy<Value = Request> {
    prop_oneof![
        ("[a-d]{0,2}", "-?[0-9]{1,3}|[a-z]{0,2}").prop_map(|(p, t)| Request::Create(p, t)),
        "[a-z_]{1,6}"
            .prop_filter("routed names", |name| name != "init"
                && name != "init_contract_terms")
            .prop_map(Request::Unrouted),
        "[a-d]{1,2}".prop_map(Request::Query),
    ]
}

proptest! {
    #[test]
    fn prop_index_lists_distinct_creates_in_order(
        products in proptest::collection::vec("[a-z]{1,8}", 0..20),
    ) {
        let engine = engine();
        let mut seen = BTreeSet::new();
        let mut expected = Vec::new();

        for (i, product) in products.iter().enumerate() {
            let result = engine.dispatch(
                "init_contract_terms",
                &[product.clone(), i.to_string()],
            );
            if seen.insert(product.clone()) {
                prop_assert!(result.is_ok());
                expected.push(product.clone());
            } else {
                prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::DuplicateContract);
            }
        }

        prop_assert_eq!(engine.list_contracts().unwrap(), expected);
    }

    #[test]
    fn prop_counter_advances_once_per_counted_request(
        requests in proptest::collection::vec(request(), 0..30),
    ) {
        let engine = engine();
        let mut expected_counter = 1u64;

        for request in requests {
            let before = engine.event_counter().unwrap();
            prop_assert_eq!(before, expected_counter);

            let counted = match request {
                Request::Create(product, temperature) => engine
                    .dispatch("init_contract_terms", &[product, temperature])
                    .is_ok(),
                Request::Unrouted(name) => {
                    let err = engine.dispatch(&name, &[]).unwrap_err();
                    prop_assert_eq!(err.kind(), ErrorKind::UnknownOperation);
                    true
                }
                Request::Query(key) => {
                    let _ = engine.query("query", &[key]);
                    false
                }
            };

            if counted {
                expected_counter += 1;
                let last = engine.events().events().pop().unwrap();
                let suffix = format!(" {}", before);
                prop_assert!(last.payload_text().ends_with(&suffix));
            }
            prop_assert_eq!(engine.event_counter().unwrap(), expected_counter);
        }

        prop_assert_eq!(engine.events().events().len() as u64, expected_counter - 1);
    }
}
