//! # Host
//!
//! Owns the engine and the notification subscription, runs requests, counts
//! them and writes their results.
//!
//! ## Output
//!
//! | Line | Shape |
//! |------|-------|
//! | payload | raw payload text (omitted when empty) |
//! | contract list | JSON array of product types |
//! | failure | `{"error": kind, "message": text}` |
//! | notification | `{"channel": "evtsender", "payload": text}` |
//! | replay result | `{"line": n, "entry": .., "ok": .., ...}` |

use crate::commands::{execute, ErrorReport, EventLine, ReplayOutcome, Request, Response};
use crate::config::HostConfig;
use anyhow::{Context, Result};
use coldchain_registry::adapters::drain;
use coldchain_registry::prelude::*;
use coldchain_telemetry::{record_notifications, record_request, OUTCOME_OK};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Engine as wired by the host: any ledger, broadcast notifications.
pub type HostEngine = RegistryEngine<Arc<dyn LedgerStore>, Arc<BroadcastEventSink>>;

/// A registry engine plus the receiving end of its notification channel.
pub struct Host {
    engine: HostEngine,
    events: broadcast::Receiver<EmittedEvent>,
}

impl Host {
    /// Open the configured ledger and subscribe to notifications.
    pub fn open(config: &HostConfig) -> Result<Self> {
        let ledger: Arc<dyn LedgerStore> = if config.ephemeral {
            info!("using in-memory ledger");
            Arc::new(InMemoryLedger::new())
        } else {
            let ledger = FileBackedLedger::open(&config.ledger_path).with_context(|| {
                format!("failed to open ledger at {}", config.ledger_path.display())
            })?;
            info!(path = %ledger.path().display(), "ledger opened");
            Arc::new(ledger)
        };
        Ok(Self::with_ledger(ledger, config.event_capacity))
    }

    /// Wire a host over an existing ledger.
    pub fn with_ledger(ledger: Arc<dyn LedgerStore>, event_capacity: usize) -> Self {
        let sink = Arc::new(BroadcastEventSink::with_capacity(event_capacity));
        let events = sink.subscribe();
        debug!(
            capacity = event_capacity,
            subscribers = sink.subscriber_count(),
            "notification channel ready"
        );
        Self {
            engine: RegistryEngine::new(ledger, sink),
            events,
        }
    }

    pub fn engine(&self) -> &HostEngine {
        &self.engine
    }

    /// Run a request, record metrics and collect the notifications it produced.
    pub fn handle(
        &mut self,
        request: &Request,
    ) -> (Result<Response, RegistryError>, Vec<EmittedEvent>) {
        let result = execute(&self.engine, request);

        let outcome = match &result {
            Ok(_) => OUTCOME_OK,
            Err(err) => err.kind().as_str(),
        };
        record_request(request.entry(), request.operation_label(), outcome);

        let events = drain(&mut self.events);
        record_notifications(events.len() as u64);
        (result, events)
    }

    /// Run one request and write its output. Returns whether it succeeded.
    pub fn run_one<W: Write>(&mut self, request: &Request, out: &mut W) -> Result<bool> {
        let (result, events) = self.handle(request);
        let ok = match &result {
            Ok(response) => {
                if let Some(text) = response.render() {
                    writeln!(out, "{text}")?;
                }
                true
            }
            Err(err) => {
                writeln!(out, "{}", serde_json::to_string(&ErrorReport::from(err))?)?;
                false
            }
        };
        write_events(out, &events)?;
        Ok(ok)
    }

    /// Run requests in order, one result line each. Returns how many failed.
    ///
    /// A failed request does not stop the replay.
    pub fn replay<W: Write>(&mut self, requests: &[(usize, Request)], out: &mut W) -> Result<usize> {
        let mut failed = 0;
        for (line, request) in requests {
            let (result, events) = self.handle(request);
            if result.is_err() {
                failed += 1;
            }
            let outcome = ReplayOutcome::new(*line, request, &result);
            writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
            write_events(out, &events)?;
        }
        info!(requests = requests.len(), failed, "replay finished");
        Ok(failed)
    }
}

fn write_events<W: Write>(out: &mut W, events: &[EmittedEvent]) -> Result<()> {
    for event in events {
        writeln!(out, "{}", serde_json::to_string(&EventLine::from(event))?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host::with_ledger(Arc::new(InMemoryLedger::new()), 16)
    }

    fn invoke(operation: &str, args: &[&str]) -> Request {
        Request::Invoke {
            operation: operation.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    fn output(host: &mut Host, request: &Request) -> (bool, String) {
        let mut out = Vec::new();
        let ok = host.run_one(request, &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_create_prints_notification() {
        let mut host = host();
        let (ok, text) = output(
            &mut host,
            &Request::Init {
                args: vec!["100".to_string()],
            },
        );
        assert!(ok);
        assert!(text.is_empty());

        let (ok, text) = output(&mut host, &invoke("init_contract_terms", &["perishable", "40"]));
        assert!(ok);
        assert_eq!(
            text,
            "{\"channel\":\"evtsender\",\"payload\":\"init_terms Event Counter is 1\"}\n"
        );
    }

    #[test]
    fn test_failure_prints_error_then_notification() {
        let mut host = host();
        let (ok, text) = output(&mut host, &invoke("bogus", &[]));
        assert!(!ok);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let error: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(error["error"], "unknown_operation");
        assert!(lines[1].contains("Invoke() Event Counter is 1"));
    }

    #[test]
    fn test_replay_continues_after_failure() {
        let mut host = host();
        let requests = vec![
            (
                1,
                Request::Init {
                    args: vec!["100".to_string()],
                },
            ),
            (2, invoke("init_contract_terms", &["meat", "35"])),
            (3, invoke("init_contract_terms", &["meat", "36"])),
            (4, Request::Contracts),
        ];

        let mut out = Vec::new();
        let failed = host.replay(&requests, &mut out).unwrap();
        assert_eq!(failed, 1);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        // init, create, its event, duplicate, contracts
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3]["line"], 3);
        assert_eq!(lines[3]["error"], "duplicate_contract");
        assert_eq!(lines[4]["contracts"], serde_json::json!(["meat"]));
    }

    #[test]
    fn test_metrics_count_requests() {
        coldchain_telemetry::register_metrics().unwrap();
        let mut host = host();
        output(&mut host, &invoke("init_contract_terms", &["", "1"]));

        let text = coldchain_telemetry::encode_metrics().unwrap();
        assert!(text.contains("outcome=\"empty_argument\""));
    }
}
