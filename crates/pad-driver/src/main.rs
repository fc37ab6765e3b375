//! PadBridge headless entry point.
//!
//! Wires the driver together with the production serial factory, the
//! logging key sink, and a snapshot pump, then runs until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ PadDriver::new()      -- injects factory, sink, observer
//!  └─ select_port()         -- spawns the background reader thread
//!       ├─ reader thread    -- read_line → parse → diff → emit keys
//!       └─ snapshot pump    -- Tokio task logging observer snapshots
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pad_driver::application::drive_pad::PadDriver;
use pad_driver::infrastructure::key_injection::logging::LoggingKeySink;
use pad_driver::infrastructure::serial::{self, SerialChannelFactory};
use pad_driver::infrastructure::ui_bridge::UiStateForwarder;

/// Bridge a serial dance pad into synthesized keyboard events.
#[derive(Debug, Parser)]
#[command(name = "pad-driver", version, about)]
struct Cli {
    /// Serial port to read from. Defaults to the last enumerated port.
    #[arg(long)]
    port: Option<String>,

    /// Print the available serial ports and exit.
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_ports {
        for name in serial::list_ports() {
            println!("{name}");
        }
        return Ok(());
    }

    // Without an explicit choice, take the last enumerated port; on the
    // machines this runs on, that is the most recently attached adapter.
    let port_name = match cli.port {
        Some(name) => name,
        None => serial::list_ports()
            .pop()
            .context("no serial ports found; pass --port explicitly")?,
    };

    let (forwarder, mut states_rx) = UiStateForwarder::channel(32);
    let driver = Arc::new(PadDriver::new(
        Arc::new(SerialChannelFactory),
        Arc::new(LoggingKeySink::new()),
        Arc::new(forwarder),
    ));

    info!("PadBridge starting");
    driver
        .select_port(&port_name)
        .with_context(|| format!("could not open port {port_name}"))?;

    // ── Snapshot pump ─────────────────────────────────────────────────────────
    let pump = tokio::spawn(async move {
        while let Some(state) = states_rx.recv().await {
            info!(pressed = ?state.pressed, "pad state");
        }
    });

    info!(port_name = %port_name, "PadBridge ready.  Press Ctrl-C to exit.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    info!("shutdown signal received");
    let stopper = Arc::clone(&driver);
    tokio::task::spawn_blocking(move || stopper.stop())
        .await
        .context("stop task failed")?;
    pump.abort();

    info!("PadBridge stopped");
    Ok(())
}
