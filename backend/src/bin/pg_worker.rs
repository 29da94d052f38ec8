//! Helper binary invoked by `pg_embedded_setup_unpriv` when tests run as root.
//!
//! The setup crate re-executes privileged cluster operations through this
//! worker. It receives an operation name (`setup`, `start`, or `stop`) and the
//! path to a JSON payload whose shape matches
//! [`pg_embedded_setup_unpriv::worker::WorkerPayload`].

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{Context, Result, eyre};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    run_worker(env::args_os())
}

fn run_worker(mut args: impl Iterator<Item = OsString>) -> Result<()> {
    let _program = args.next();
    let operation = Operation::parse(
        &args
            .next()
            .ok_or_else(|| eyre!("missing operation argument"))?,
    )?;
    let config_path = PathBuf::from(
        args.next()
            .ok_or_else(|| eyre!("missing config path argument"))?,
    );
    if let Some(extra) = args.next() {
        return Err(eyre!(
            "unexpected extra argument: {}; expected only operation and config path",
            extra.to_string_lossy()
        ));
    }

    let raw = fs::read(&config_path)
        .with_context(|| format!("failed to read worker config at {config_path:?}"))?;
    let payload: WorkerPayload = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse worker config at {config_path:?}"))?;
    execute(operation, payload)
}

fn execute(operation: Operation, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| eyre!("failed to rebuild postgres settings: {err}"))?;
    apply_environment(payload.environment);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build worker runtime")?;

    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match operation {
                Operation::Setup => postgres.setup().await,
                Operation::Start => postgres.start().await,
                Operation::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("postgresql_embedded::{operation} failed"))?;
    Ok(())
}

fn apply_environment(env: Vec<(String, Option<PlainSecret>)>) {
    for (key, value) in env {
        // SAFETY: runs before the runtime exists, so no other threads observe
        // the mutation.
        match value {
            Some(val) => unsafe { env::set_var(&key, val.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Operation {
    Setup,
    Start,
    Stop,
}

impl Operation {
    fn parse(raw: &OsStr) -> Result<Self> {
        match raw.to_string_lossy().as_ref() {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!(
                "unknown pg_worker operation '{other}'; valid operations are setup, start, and stop"
            )),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}
