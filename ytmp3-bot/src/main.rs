//! ytmp3-bot - YouTube to MP3 Telegram bot
//!
//! Receives YouTube links, downloads the audio track with yt-dlp, tags the MP3
//! with a cleaned title, uploader and cover art, and sends it back.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ytmp3_common::config::{self, TomlConfig};

use ytmp3_bot::AppContext;

/// Command-line arguments for ytmp3-bot
#[derive(Parser, Debug)]
#[command(name = "ytmp3-bot")]
#[command(about = "Telegram bot converting YouTube links to tagged MP3 files")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder for per-request working directories
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Bot token
    #[arg(long)]
    token: Option<String>,

    /// Username allowed to run /clear
    #[arg(long)]
    admin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "ytmp3_bot={level},ytmp3_common={level}",
                    level = toml_config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ytmp3-bot");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Step 1: Resolve root folder and token
    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    info!("Root folder: {}", root_folder.display());

    let token = config::resolve_bot_token(args.token.as_deref(), &toml_config)
        .context("Failed to resolve bot token")?;

    // Step 2: Build application context (creates root folder if missing)
    let ctx = AppContext::from_config(toml_config, root_folder, args.admin)
        .context("Failed to initialize application")?;
    info!("yt-dlp: {}", ctx.config.ytdlp_path);

    // Step 3: Poll for updates
    let bot = Bot::new(token);
    ytmp3_bot::telegram::run(bot, Arc::new(ctx))
        .await
        .context("Telegram dispatcher error")?;

    info!("Shutdown complete");
    Ok(())
}
