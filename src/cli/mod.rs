pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roost")]
#[command(about = "Keep up with a handful of social timelines", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/roost/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (default: roost.db in the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start tracking an account
    Follow {
        /// Account handle, with or without a leading @
        handle: String,
    },
    /// Stop tracking an account
    Remove {
        /// Handle exactly as shown by `roost list`
        handle: String,
    },
    /// List tracked accounts
    List,
    /// Fetch every tracked account once and print the newest posts
    Sync,
    /// Sync periodically in the foreground until interrupted
    Daemon {
        /// Time between passes (e.g. "10m", "1h")
        #[arg(short, long, default_value = "10m")]
        interval: String,

        /// Append logs to this file instead of stderr
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
    /// Launch the interactive menu
    Tui,
}
