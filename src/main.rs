//! Stegchain - hide text in PNG images, anchor it on a blockchain
//!
//! Command-line and terminal client for the stegchain backend.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    AppContext, CommandExecutor, ExtractCommand, HashCommand, HealthCommand, HideCommand,
    RecordsCommand, TuiCommand, VerifyCommand,
};
use stegchain::config::{ClientConfig, Overrides};
use stegchain::logging::{init_logging, LogTarget};
use stegchain::HttpGateway;

/// Stegchain - hide text in PNG images, anchor it on a blockchain
///
/// Text is hidden in a PNG by the backend and the SHA-256 of the text is
/// stored on the blockchain, so an extracted text can be checked for
/// tampering. Without a subcommand the interactive interface opens.
#[derive(Parser)]
#[command(name = "stegchain")]
#[command(version)]
#[command(about = "Hide text in PNG images with blockchain-anchored integrity checks")]
#[command(long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "STEGCHAIN_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", global = true, env = "STEGCHAIN_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Configuration file (default: ~/.stegchain/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide text in a PNG image
    Hide(HideCommand),

    /// Extract hidden text from a PNG image and verify it
    Extract(ExtractCommand),

    /// Verify a text against an anchored hash
    Verify(VerifyCommand),

    /// List records or show one
    Records(RecordsCommand),

    /// Print the hash of a text as computed by the backend
    Hash(HashCommand),

    /// Check backend health
    Health(HealthCommand),

    /// Open the interactive interface
    Tui(TuiCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.as_deref())
        .and_then(|c| {
            c.with_overrides(Overrides {
                api_url: cli.api_url.clone(),
                timeout_secs: cli.timeout_secs,
            })
        })
        .context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Tui(TuiCommand::default()));

    // The TUI owns the terminal, so its logs go to a file
    let target = match command {
        Commands::Tui(_) => LogTarget::File(config.log_file()?),
        _ => LogTarget::Stderr,
    };
    let _guard = init_logging(&config.log, target)?;
    tracing::debug!(path = ?cli.config, level = %config.log.level, "configuration loaded");

    let gateway = HttpGateway::from_config(&config).context("Failed to create HTTP client")?;
    tracing::debug!(api_url = %gateway.base_url(), timeout_secs = config.timeout_secs, "gateway ready");

    let ctx = AppContext {
        config,
        gateway: Arc::new(gateway),
    };

    match command {
        Commands::Hide(cmd) => cmd.execute(&ctx).await,
        Commands::Extract(cmd) => cmd.execute(&ctx).await,
        Commands::Verify(cmd) => cmd.execute(&ctx).await,
        Commands::Records(cmd) => cmd.execute(&ctx).await,
        Commands::Hash(cmd) => cmd.execute(&ctx).await,
        Commands::Health(cmd) => cmd.execute(&ctx).await,
        Commands::Tui(cmd) => cmd.execute(&ctx).await,
    }
}
