//! # Domain Entities
//!
//! Records stored in the ledger and events emitted on the notification channel.

use serde::{Deserialize, Serialize};

/// Agreed product/temperature constraint, primary-keyed by product type.
///
/// Immutable once created: the registry has no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    /// Type of product being shipped. Also the ledger key of the record.
    pub product_type: String,
    /// Highest temperature tolerated, in degrees Fahrenheit.
    pub max_temperature_f: i64,
}

impl ContractTerms {
    /// Create contract terms.
    pub fn new(product_type: impl Into<String>, max_temperature_f: i64) -> Self {
        Self {
            product_type: product_type.into(),
            max_temperature_f,
        }
    }
}

/// A shipment event reported against a contract.
///
/// Declared for the shipment workflow. No registry operation creates or
/// validates shipments yet; how a shipment is checked against its contract
/// terms is undecided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub contract_id: String,
    pub value: i64,
    pub temperature_f: i64,
    pub carrier_name: String,
    pub location: String,
    pub ship_event: String,
    pub timestamp: i64,
}

/// Which request path produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSource {
    /// A contract was created.
    ContractTerms,
    /// The dispatcher received an operation it does not route.
    UnroutedInvoke,
}

impl NotificationSource {
    /// Fixed text placed before the counter value.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ContractTerms => "init_terms Event Counter is",
            Self::UnroutedInvoke => "Invoke() Event Counter is",
        }
    }
}

/// Notification labelled with the pre-increment event counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub source: NotificationSource,
    pub counter: u64,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(source: NotificationSource, counter: u64) -> Self {
        Self { source, counter }
    }

    /// Wire payload, e.g. `init_terms Event Counter is 3`.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        format!("{} {}", self.source.label(), self.counter).into_bytes()
    }
}

/// An event as seen by a sink: channel name and opaque payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub channel: String,
    pub payload: Vec<u8>,
}

impl EmittedEvent {
    /// Payload as text, replacing invalid UTF-8.
    #[must_use]
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_payload() {
        let n = Notification::new(NotificationSource::ContractTerms, 7);
        assert_eq!(n.payload(), b"init_terms Event Counter is 7".to_vec());

        let n = Notification::new(NotificationSource::UnroutedInvoke, 1);
        assert_eq!(n.payload(), b"Invoke() Event Counter is 1".to_vec());
    }

    #[test]
    fn test_shipment_field_names() {
        let shipment = Shipment {
            contract_id: "perishable".into(),
            value: 1200,
            temperature_f: 38,
            carrier_name: "Polar Freight".into(),
            location: "Memphis".into(),
            ship_event: "departed".into(),
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_value(&shipment).unwrap();
        for field in [
            "contract_id",
            "value",
            "temperature_f",
            "carrier_name",
            "location",
            "ship_event",
            "timestamp",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        let back: Shipment = serde_json::from_value(json).unwrap();
        assert_eq!(back, shipment);
    }

    #[test]
    fn test_emitted_event_text() {
        let event = EmittedEvent {
            channel: "evtsender".into(),
            payload: b"Invoke() Event Counter is 4".to_vec(),
        };
        assert_eq!(event.payload_text(), "Invoke() Event Counter is 4");
    }
}
