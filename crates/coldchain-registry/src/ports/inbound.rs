//! # Driving Ports (API - Inbound)
//!
//! Entry points the host invokes once per request.

use crate::errors::RegistryError;

/// Bytes returned to the caller. Empty for mutations that succeed.
pub type Payload = Vec<u8>;

/// The three entry points exposed to the host.
///
/// Each call reads current ledger state, validates, writes, and returns. No
/// state survives between calls.
pub trait RegistryApi {
    /// Bootstrap or reset the ledger: `[initial_holding]`.
    fn initialize(&self, args: &[String]) -> Result<Payload, RegistryError>;

    /// Route a mutating operation by name.
    fn dispatch(&self, operation: &str, args: &[String]) -> Result<Payload, RegistryError>;

    /// Route a read-only operation by name.
    fn query(&self, operation: &str, args: &[String]) -> Result<Payload, RegistryError>;
}
