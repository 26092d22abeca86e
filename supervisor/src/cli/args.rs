//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hubctl")]
#[command(about = "Install and supervise the local MCP hub server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Hub port (default: from .hub.toml or 7423)
    #[arg(long, env = "HUB_PORT", global = true)]
    pub port: Option<u16>,

    /// Hub host (default: from .hub.toml or 127.0.0.1)
    #[arg(long, env = "HUB_HOST", global = true)]
    pub host: Option<String>,

    /// Install root override (default: ~/.mcp-hub)
    #[arg(long, env = "HUB_INSTALL_ROOT", global = true)]
    pub install_root: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the bundled hub payload into the install root and provision
    /// its dependencies
    Install,
    /// Start the hub server (no-op if already running)
    Start,
    /// Stop the hub server
    Stop,
    /// Show hub state, endpoint, and prerequisite checks
    Status,
    /// View hub server logs
    Logs {
        /// Number of lines to show (0 = all)
        #[arg(long, short, default_value = "50")]
        lines: usize,
    },
    /// Print endpoint definitions as JSON
    Definitions,
}
