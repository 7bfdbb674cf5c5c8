use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roost::app::AppContext;
use roost::cli::{commands, Cli, Commands};
use roost::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        // The terminal belongs to the menu, so logs go to a file.
        Commands::Tui => {
            let data_dir = Config::data_dir()?;
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("creating {}", data_dir.display()))?;
            init_file_tracing(&data_dir.join("roost.log"), "roost=info")?;
        }
        Commands::Daemon { log: Some(path), .. } => init_file_tracing(path, "roost=info")?,
        Commands::Daemon { log: None, .. } => init_tracing("roost=info"),
        _ => init_tracing("warn"),
    }

    let invalid = config.keybindings.invalid_bindings();
    if !invalid.is_empty() {
        tracing::warn!("Ignoring unrecognized key bindings: {}", invalid.join(", "));
    }

    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::Follow { handle } => {
            commands::follow(&ctx, &handle).await?;
        }
        Commands::Remove { handle } => {
            commands::remove(&ctx, &handle).await?;
        }
        Commands::List => {
            commands::list(&ctx)?;
        }
        Commands::Sync => {
            commands::sync(&ctx).await?;
        }
        Commands::Daemon { interval, .. } => {
            commands::daemon(&ctx, &interval).await?;
        }
        Commands::Tui => {
            roost::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_tracing(default: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(default))
        .init();
}

fn init_file_tracing(path: &Path, default: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter(default))
        .init();
    Ok(())
}
