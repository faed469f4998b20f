//! # Requests
//!
//! One request per entry point, how each runs against an engine, and the JSON
//! shapes written back to the operator.
//!
//! ## Replay Format
//!
//! One JSON object per line, tagged by `entry`. Blank lines and lines starting
//! with `#` are skipped.
//!
//! ```text
//! {"entry": "init", "args": ["100"]}
//! {"entry": "invoke", "operation": "init_contract_terms", "args": ["perishable", "40"]}
//! {"entry": "query", "operation": "query", "args": ["perishable"]}
//! {"entry": "delete", "args": ["perishable"]}
//! {"entry": "contracts"}
//! ```

use anyhow::{Context, Result};
use coldchain_registry::dispatch::{Operation, QueryOperation, OP_QUERY};
use coldchain_registry::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A single registry request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum Request {
    /// Initialize entry point
    Init {
        #[serde(default)]
        args: Vec<String>,
    },
    /// Mutating entry point
    Invoke {
        operation: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Query entry point
    Query {
        operation: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Direct key removal
    Delete {
        #[serde(default)]
        args: Vec<String>,
    },
    /// Contract index listing
    Contracts,
}

impl Request {
    /// Entry point label for logs and metrics.
    #[must_use]
    pub fn entry(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Invoke { .. } => "invoke",
            Self::Query { .. } => "query",
            Self::Delete { .. } => "delete",
            Self::Contracts => "contracts",
        }
    }

    /// Operation label for metrics. Unrouted names collapse to `unrouted`.
    #[must_use]
    pub fn operation_label(&self) -> &str {
        match self {
            Self::Init { .. } => "init",
            Self::Invoke { operation, .. } => match Operation::from_name(operation) {
                Operation::Unrouted(_) => "unrouted",
                routed => routed.name(),
            },
            Self::Query { operation, .. } => match QueryOperation::from_name(operation) {
                QueryOperation::QueryKey => OP_QUERY,
                QueryOperation::Unrouted(_) => "unrouted",
            },
            Self::Delete { .. } => "delete",
            Self::Contracts => "contracts",
        }
    }
}

/// Successful result of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Raw payload from an entry point (often empty).
    Payload(Payload),
    /// Product types from the contract index.
    Contracts(Vec<String>),
}

impl Response {
    /// Text written to stdout, if any.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Payload(payload) if payload.is_empty() => None,
            Self::Payload(payload) => Some(String::from_utf8_lossy(payload).into_owned()),
            Self::Contracts(products) => serde_json::to_string(products).ok(),
        }
    }
}

/// Run a request against the engine.
pub fn execute<L, E>(engine: &RegistryEngine<L, E>, request: &Request) -> Result<Response, RegistryError>
where
    L: LedgerStore,
    E: EventSink,
{
    match request {
        Request::Init { args } => engine.initialize(args).map(Response::Payload),
        Request::Invoke { operation, args } => {
            engine.dispatch(operation, args).map(Response::Payload)
        }
        Request::Query { operation, args } => engine.query(operation, args).map(Response::Payload),
        Request::Delete { args } => engine.delete_key(args).map(Response::Payload),
        Request::Contracts => engine.list_contracts().map(Response::Contracts),
    }
}

// =============================================================================
// OUTPUT SHAPES
// =============================================================================

/// Structured failure written for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: ErrorKind,
    pub message: String,
}

impl From<&RegistryError> for ErrorReport {
    fn from(err: &RegistryError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A notification as written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLine {
    pub channel: String,
    pub payload: String,
}

impl From<&EmittedEvent> for EventLine {
    fn from(event: &EmittedEvent) -> Self {
        Self {
            channel: event.channel.clone(),
            payload: event.payload_text(),
        }
    }
}

/// Per-line result of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub line: usize,
    pub entry: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracts: Option<Vec<String>>,
    #[serde(flatten)]
    pub error: Option<ErrorReport>,
}

impl ReplayOutcome {
    /// Describe the result of the request read from `line`.
    pub fn new(line: usize, request: &Request, result: &Result<Response, RegistryError>) -> Self {
        let operation = match request {
            Request::Invoke { operation, .. } | Request::Query { operation, .. } => {
                Some(operation.clone())
            }
            _ => None,
        };
        let mut outcome = Self {
            line,
            entry: request.entry(),
            operation,
            ok: result.is_ok(),
            payload: None,
            contracts: None,
            error: None,
        };
        match result {
            Ok(Response::Payload(payload)) if !payload.is_empty() => {
                outcome.payload = Some(String::from_utf8_lossy(payload).into_owned());
            }
            Ok(Response::Payload(_)) => {}
            Ok(Response::Contracts(products)) => outcome.contracts = Some(products.clone()),
            Err(err) => outcome.error = Some(ErrorReport::from(err)),
        }
        outcome
    }
}

// =============================================================================
// REPLAY FILES
// =============================================================================

/// Parse a JSON-lines request stream. Returns `(line number, request)` pairs.
pub fn parse_replay<R: BufRead>(reader: R) -> Result<Vec<(usize, Request)>> {
    let mut requests = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read line {number}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let request: Request = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid request on line {number}"))?;
        requests.push((number, request));
    }
    Ok(requests)
}

/// Read and parse a replay file.
pub fn read_replay(path: &Path) -> Result<Vec<(usize, Request)>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open replay file {}", path.display()))?;
    parse_replay(BufReader::new(file))
        .with_context(|| format!("failed to parse replay file {}", path.display()))
}
