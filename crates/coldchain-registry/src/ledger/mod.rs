//! # Ledger Components
//!
//! Everything that touches ledger keys: the State Accessor, and the two
//! reserved-entry components built on it. None of them cache values between
//! requests.

pub mod accessor;
pub mod index;
pub mod sequencer;

pub use accessor::StateAccessor;
pub use index::ContractIndex;
pub use sequencer::EventSequencer;
