//! # Cold-Chain Host
//!
//! Command-line host for the contract registry.
//!
//! ## Modules
//!
//! - `cli` - `clap` argument definitions
//! - `config` - ledger location and channel capacity from env and flags
//! - `commands` - request model, execution and output shapes
//! - `host` - engine wiring, notification draining, metrics
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | request (or every replayed request) succeeded |
//! | 1 | the registry rejected a request |
//! | 2 | startup failure: bad configuration, unreadable ledger or replay file |

pub mod cli;
pub mod commands;
pub mod config;
pub mod host;

pub use cli::{Cli, Command};
pub use commands::{execute, read_replay, Request, Response};
pub use config::{ConfigError, HostConfig};
pub use host::{Host, HostEngine};
