//! Waylight TUI - the launcher popup in a terminal.
//!
//! Connects to the search backend over its Unix socket (or serves mock
//! results when the backend is unavailable) and drives the popup controller
//! with terminal input.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use waylight_bridge::Connection;
use waylight_popup::{PopupConfig, PopupController, RecordingSurface, RowLayout, runtime};

mod cli;
mod colors;
mod input;
mod surface;
mod view;

use cli::{Cli, Commands};
use surface::TerminalSurface;

fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "warn,waylight=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("waylight-tui-{timestamp}.log");
    let log_path = log_dir.join(&log_filename);

    let symlink_path = log_dir.join("waylight-tui.log");
    let _ = std::fs::remove_file(&symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<PopupConfig> {
    let Some(path) = cli.config.clone().or_else(PopupConfig::default_path) else {
        return Ok(PopupConfig::default());
    };
    PopupConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = load_config(&cli)?;
    tracing::debug!("Config: {:?}", config);

    let connection = if cli.offline {
        waylight_bridge::offline(config.mock_delay())
    } else {
        let socket = cli.socket.clone().or_else(|| config.socket_path.clone());
        waylight_bridge::connect(socket, config.mock_delay()).await
    };
    tracing::info!("Backend: {:?}", connection.mode);

    match cli.command {
        Some(Commands::Query { query }) => search_query(&config, connection, &query).await,
        Some(Commands::Tui) | None => run_tui(&config, connection).await,
    }
}

async fn run_tui(config: &PopupConfig, connection: Connection) -> Result<()> {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (surface, hits) =
        TerminalSurface::enter(events_tx.clone()).context("Failed to set up terminal")?;
    let reader = tokio::spawn(input::forward_events(events_tx, hits));

    let mut controller = PopupController::new(surface, connection.handle, config);
    let exit = runtime::run(&mut controller, events_rx, connection.inbound).await;
    tracing::debug!("Popup loop finished: {:?}", exit);

    reader.abort();
    controller.surface_mut().leave()?;

    // Give the bridge writer a moment to deliver the close message
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}

/// Run one search headlessly and print the rendered rows.
async fn search_query(config: &PopupConfig, connection: Connection, query: &str) -> Result<()> {
    println!("Searching: {query}");

    let Connection {
        handle,
        mut inbound,
        ..
    } = connection;
    let mut controller = PopupController::new(RecordingSurface::new(), handle, config);
    controller.start();
    controller.on_input(query, Instant::now());

    let received = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let wake = controller
                .next_deadline(Instant::now())
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(60));

            tokio::select! {
                message = inbound.recv() => {
                    let Some(message) = message else {
                        return false;
                    };
                    controller.on_inbound(message, Instant::now());
                    if !controller.results().is_empty() {
                        return true;
                    }
                }
                () = sleep_until(wake) => controller.tick(Instant::now()),
            }
        }
    })
    .await;

    if !matches!(received, Ok(true)) {
        println!("No results");
        return Ok(());
    }

    println!();
    println!("Results: {} items", controller.rendered().len());
    for row in controller.rendered().result_rows() {
        match &row.layout {
            RowLayout::Calc { expression, value } => {
                println!("  {}. {} {} [{}]", row.index + 1, expression, value, row.kind.as_str());
            }
            RowLayout::Entry { label, detail } => {
                println!(
                    "  {}. {} - {} [{}]",
                    row.index + 1,
                    label,
                    detail.as_deref().unwrap_or(""),
                    row.kind.as_str()
                );
            }
        }
    }
    Ok(())
}
