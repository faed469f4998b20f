//! Command-line surface.

use crate::commands::Request;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Run cold-chain registry requests against a local ledger.
#[derive(Parser, Debug)]
#[command(name = "coldchain-host")]
#[command(about = "Run cold-chain contract registry requests against a local ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger file (overrides COLDCHAIN_LEDGER_PATH)
    #[arg(short, long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Use a throwaway in-memory ledger
    #[arg(long, global = true, conflicts_with = "ledger")]
    pub ephemeral: bool,

    /// Notification queue capacity (overrides COLDCHAIN_EVENT_CAPACITY)
    #[arg(long, global = true)]
    pub event_capacity: Option<usize>,

    /// Print Prometheus counters after the command
    #[arg(long, global = true)]
    pub metrics: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bootstrap or reset the registry with an initial holding
    Init {
        /// Initial holding (integer)
        #[arg(value_name = "HOLDING", allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Call the mutating entry point, e.g. `invoke init_contract_terms perishable 40`
    Invoke {
        /// Operation name
        operation: String,

        /// Operation arguments
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Call the query entry point, e.g. `query query perishable`
    Query {
        /// Operation name
        operation: String,

        /// Operation arguments
        args: Vec<String>,
    },

    /// Remove a key from the ledger
    Delete {
        /// Ledger key
        key: String,
    },

    /// List product types with contract terms, in creation order
    Contracts,

    /// Execute a JSON-lines request file in order
    Replay {
        /// Request file, one JSON request per line
        file: PathBuf,
    },
}

impl Command {
    /// The single request this command runs. `None` for `replay`.
    #[must_use]
    pub fn request(&self) -> Option<Request> {
        match self {
            Self::Init { args } => Some(Request::Init { args: args.clone() }),
            Self::Invoke { operation, args } => Some(Request::Invoke {
                operation: operation.clone(),
                args: args.clone(),
            }),
            Self::Query { operation, args } => Some(Request::Query {
                operation: operation.clone(),
                args: args.clone(),
            }),
            Self::Delete { key } => Some(Request::Delete {
                args: vec![key.clone()],
            }),
            Self::Contracts => Some(Request::Contracts),
            Self::Replay { .. } => None,
        }
    }
}
