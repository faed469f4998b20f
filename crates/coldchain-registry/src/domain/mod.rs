//! # Domain Layer (Inner Hexagon)
//!
//! Pure types and functions: no I/O, no ledger access.

pub mod codec;
pub mod entities;
pub mod keys;
pub mod validation;

pub use entities::*;
pub use keys::*;
