//! CLI argument parsing for waylight-tui.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "waylight-tui")]
#[command(about = "Waylight launcher popup in the terminal", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/waylight/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend socket path, overriding the config file
    #[arg(short, long)]
    pub socket: Option<PathBuf>,

    /// Skip the backend and serve mock results
    #[arg(long)]
    pub offline: bool,

    /// Enable debug logging (logs to /tmp/waylight-tui.log)
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive popup (default)
    Tui,

    /// One-shot search query (for testing)
    Query {
        /// Search query
        query: String,
    },
}
