//! Stockgate access check from the command line.
//!
//! # Purpose
//! Loads the access configuration, runs one `authorize` call for a session
//! payload and a path, and prints the decision as JSON on stdout. Deploy
//! scripts and the web front end's smoke tests use it to check route rules
//! without starting the application.
//!
//! # Notes
//! Logs go to stderr (`RUST_LOG`, default `info`). Exit status is 0 on allow,
//! 2 on deny and 1 on configuration or input errors.
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use stockgate_authz::{AccessConfig, Guard, GuardDecision};
use tracing::{error, info};

const EXIT_DENY: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "gatecheck")]
#[command(about = "Run one stockgate access check and print the decision")]
struct Args {
    /// Requested path, e.g. /dashboard/stock/gros/cashier
    #[arg(long)]
    path: String,

    /// Raw session payload (JSON text)
    #[arg(long, conflicts_with = "payload_file")]
    payload: Option<String>,

    /// Read the session payload from a file
    #[arg(long)]
    payload_file: Option<PathBuf>,

    /// Access config YAML (defaults to $STOCKGATE_CONFIG, then built-in)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(outcome) if outcome.is_allow() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_DENY),
        Err(err) => {
            error!(error = ?err, "gatecheck failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<GuardDecision> {
    let access = config::from_env_or_yaml(args.config.as_deref())?;
    check(&access, &args)
}

fn check(access: &AccessConfig, args: &Args) -> Result<GuardDecision> {
    let guard = Guard::new(access).context("build guard")?;
    let payload = read_payload(args)?;

    let outcome = guard.authorize(&payload, &args.path);
    info!(
        path = %args.path,
        allowed = outcome.is_allow(),
        purge_session = outcome.purge_session,
        "access check complete"
    );
    println!("{}", render(&outcome)?);
    Ok(outcome)
}

fn read_payload(args: &Args) -> Result<String> {
    match (&args.payload, &args.payload_file) {
        (Some(payload), _) => Ok(payload.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read payload file {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

fn render(outcome: &GuardDecision) -> Result<String> {
    serde_json::to_string(outcome).context("encode decision")
}
