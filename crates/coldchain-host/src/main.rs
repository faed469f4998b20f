//! # Cold-Chain Host
//!
//! Entry point: parse flags, load configuration, start telemetry, open the
//! ledger and run the command.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use coldchain_host::{read_replay, Cli, Command, Host, HostConfig};
use coldchain_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut telemetry = TelemetryConfig::from_env();
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    let _telemetry = init_telemetry(telemetry).context("failed to initialize telemetry")?;

    let config = HostConfig::from_env().with_overrides(
        cli.ledger.clone(),
        cli.ephemeral,
        cli.event_capacity,
    );
    config.validate().context("invalid host configuration")?;
    debug!(?config, "host configuration");

    let mut host = Host::open(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let succeeded = match &cli.command {
        Command::Replay { file } => {
            let requests = read_replay(file)?;
            host.replay(&requests, &mut out)? == 0
        }
        command => {
            let request = command
                .request()
                .context("command does not map to a registry request")?;
            host.run_one(&request, &mut out)?
        }
    };

    if cli.metrics {
        write!(out, "{}", encode_metrics()?)?;
    }
    out.flush()?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
