//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Ports (Inbound)**: `RegistryApi`
//! - **Driven Ports (Outbound)**: `LedgerStore`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
