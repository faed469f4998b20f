//! Reserved ledger keys and channel names.
//!
//! Generic keys are caller-chosen and share one namespace with these.

/// Key holding the JSON array of known product types.
pub const CONTRACT_INDEX_KEY: &str = "_contractindex";

/// Key holding the event counter as a decimal string.
pub const EVENT_COUNTER_KEY: &str = "event_counter";

/// Key written by initialize with the initial holding.
pub const BOOTSTRAP_KEY: &str = "abc";

/// Notification channel name.
pub const EVENT_CHANNEL: &str = "evtsender";

/// Value the event counter starts from.
pub const INITIAL_EVENT_COUNTER: u64 = 1;

/// Returns true if `key` is one of the engine's reserved entries.
///
/// Reserved keys are not enforced. Creating contract terms under
/// `_contractindex` overwrites the index with a contract record, and every
/// later create or listing fails with `Corrupted` until initialize runs again.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    matches!(key, CONTRACT_INDEX_KEY | EVENT_COUNTER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved("_contractindex"));
        assert!(is_reserved("event_counter"));
        assert!(!is_reserved(BOOTSTRAP_KEY));
        assert!(!is_reserved("perishable"));
    }
}
