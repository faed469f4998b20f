//! # Record Codec
//!
//! Byte encodings of everything the engine stores.
//!
//! | Entry | Encoding |
//! |-------|----------|
//! | contract terms | JSON object `{"product_type", "max_temperature_f"}` |
//! | contract index | JSON array of strings |
//! | event counter | decimal ASCII |
//! | bootstrap value | decimal ASCII |

use crate::domain::entities::ContractTerms;
use crate::domain::keys::{CONTRACT_INDEX_KEY, EVENT_COUNTER_KEY};
use crate::errors::LedgerError;

/// Encode contract terms for storage.
pub fn encode_terms(terms: &ContractTerms) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(terms).map_err(|e| LedgerError::corrupted(&terms.product_type, e.to_string()))
}

/// Decode a stored value as contract terms.
///
/// `None` when the bytes are not a contract-terms record. Generic keys may hold
/// anything, so this is not an error.
#[must_use]
pub fn decode_terms(bytes: &[u8]) -> Option<ContractTerms> {
    serde_json::from_slice(bytes).ok()
}

/// Encode the contract index.
pub fn encode_index(entries: &[String]) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(entries).map_err(|e| LedgerError::corrupted(CONTRACT_INDEX_KEY, e.to_string()))
}

/// Decode the contract index.
///
/// Empty bytes and JSON `null` both mean an empty index.
pub fn decode_index(bytes: &[u8]) -> Result<Vec<String>, LedgerError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let entries: Option<Vec<String>> = serde_json::from_slice(bytes)
        .map_err(|e| LedgerError::corrupted(CONTRACT_INDEX_KEY, e.to_string()))?;
    Ok(entries.unwrap_or_default())
}

/// Encode the event counter.
#[must_use]
pub fn encode_counter(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

/// Decode the event counter.
pub fn decode_counter(bytes: &[u8]) -> Result<u64, LedgerError> {
    std::str::from_utf8(bytes)
        .ok()
        .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| {
            LedgerError::corrupted(
                EVENT_COUNTER_KEY,
                format!("not a decimal counter: {:?}", String::from_utf8_lossy(bytes)),
            )
        })
}

/// Encode a signed integer as decimal ASCII.
#[must_use]
pub fn encode_integer(value: i64) -> Vec<u8> {
    value.to_string().into_bytes()
}
