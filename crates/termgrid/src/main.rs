//! # termgrid
//!
//! Multi-pane terminal host. Manages a flat list of shell sessions,
//! named groups with derived layouts, and per-session attention status
//! (idle / running / waiting for input / error).
//!
//! ## Architecture
//!
//! The binary ties together:
//! - termgrid-core: shared types, engine contract, configuration
//! - termgrid-store: session and group state, snapshot persistence
//! - termgrid-layout: pane rectangle computation
//! - termgrid-detector: attention state machine

use std::path::PathBuf;
use std::sync::Arc;

use termgrid::{Host, HostCommand, HostEvent, NullEngine};
use termgrid_core::HostConfig;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match config_path(&args) {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            HostConfig::from_file(&path)?
        }
        None => HostConfig::default(),
    };

    let snapshot_path = snapshot_path(&args);

    tracing::info!("termgrid v0.1.0 starting...");

    let engine = Arc::new(NullEngine::new());
    let host = Host::new(engine, config, snapshot_path);

    let (tx, rx) = mpsc::unbounded_channel::<HostEvent>();
    let loop_handle = tokio::spawn(host.run(rx));

    // Run until interrupted, then drain the loop through a clean shutdown
    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");

    let _ = tx.send(HostEvent::Command(HostCommand::Shutdown));
    loop_handle.await?;

    tracing::info!("termgrid stopped");
    Ok(())
}

fn config_path(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--config").map(PathBuf::from)
}

fn snapshot_path(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--snapshot")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".termgrid").join("snapshot.json"))
        })
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
